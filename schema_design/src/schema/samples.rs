//! Built-in sample schema

use crate::schema::types::{
    Column, DatabaseSchema, DefaultValue, Relationship, RelationshipType, Table,
};

/// A small e-commerce schema: customers place orders of products grouped in
/// (nested) categories
pub fn sample_ecommerce_schema() -> DatabaseSchema {
    let customers = Table::new("customers")
        .with_description("Customer information")
        .with_column(Column::new("id", "INTEGER").primary_key().not_null())
        .with_column(Column::new("email", "VARCHAR(255)").not_null().unique())
        .with_column(Column::new("first_name", "VARCHAR(100)").not_null())
        .with_column(Column::new("last_name", "VARCHAR(100)").not_null())
        .with_column(Column::new("phone", "VARCHAR(20)"))
        .with_column(Column::new("created_at", "TIMESTAMP").not_null())
        .with_column(Column::new("updated_at", "TIMESTAMP"));

    let categories = Table::new("categories")
        .with_description("Product categories")
        .with_column(Column::new("id", "INTEGER").primary_key().not_null())
        .with_column(Column::new("name", "VARCHAR(100)").not_null().unique())
        .with_column(Column::new("description", "TEXT"))
        .with_column(Column::new("parent_id", "INTEGER"))
        .with_foreign_key("parent_id", "categories", "id");

    let products = Table::new("products")
        .with_description("Product catalog")
        .with_column(Column::new("id", "INTEGER").primary_key().not_null())
        .with_column(Column::new("name", "VARCHAR(200)").not_null())
        .with_column(Column::new("description", "TEXT"))
        .with_column(Column::new("price", "DECIMAL(10,2)").not_null())
        .with_column(Column::new("category_id", "INTEGER"))
        .with_column(
            Column::new("stock_quantity", "INTEGER")
                .not_null()
                .default(DefaultValue::Integer(0)),
        )
        .with_column(Column::new("created_at", "TIMESTAMP").not_null())
        .with_column(Column::new("updated_at", "TIMESTAMP"))
        .with_foreign_key("category_id", "categories", "id");

    let orders = Table::new("orders")
        .with_description("Customer orders")
        .with_column(Column::new("id", "INTEGER").primary_key().not_null())
        .with_column(Column::new("customer_id", "INTEGER").not_null())
        .with_column(Column::new("order_date", "TIMESTAMP").not_null())
        .with_column(Column::new("status", "VARCHAR(50)").not_null())
        .with_column(Column::new("total_amount", "DECIMAL(10,2)").not_null())
        .with_column(Column::new("shipping_address", "TEXT"))
        .with_column(Column::new("billing_address", "TEXT"))
        .with_foreign_key("customer_id", "customers", "id");

    let order_items = Table::new("order_items")
        .with_description("Individual items within orders")
        .with_column(Column::new("id", "INTEGER").primary_key().not_null())
        .with_column(Column::new("order_id", "INTEGER").not_null())
        .with_column(Column::new("product_id", "INTEGER").not_null())
        .with_column(Column::new("quantity", "INTEGER").not_null())
        .with_column(Column::new("unit_price", "DECIMAL(10,2)").not_null())
        .with_column(Column::new("total_price", "DECIMAL(10,2)").not_null())
        .with_foreign_key("order_id", "orders", "id")
        .with_foreign_key("product_id", "products", "id");

    let one_to_many = |parent: &str, child: &str, column: &str| {
        Relationship::new(parent, "id", child, column, RelationshipType::OneToMany)
    };

    DatabaseSchema::new(
        "ecommerce_system",
        vec![customers, categories, products, orders, order_items],
        vec![
            one_to_many("customers", "orders", "customer_id"),
            one_to_many("categories", "products", "category_id"),
            one_to_many("categories", "categories", "parent_id"),
            one_to_many("orders", "order_items", "order_id"),
            one_to_many("products", "order_items", "product_id"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_consistent() {
        let schema = sample_ecommerce_schema();
        schema.validate().unwrap();
        assert_eq!(schema.tables.len(), 5);
        assert_eq!(schema.relationships.len(), 5);
        assert_eq!(
            schema.table("products").unwrap().column("category_id").unwrap().foreign_key.as_deref(),
            Some("categories.id")
        );
    }
}
