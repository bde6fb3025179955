use pretty_assertions::assert_eq;
use rstest::rstest;

use schema_design::schema::samples::sample_ecommerce_schema;
use schema_design::schema::types::{Column, DatabaseSchema, DefaultValue, Table};
use schema_design::{export_schema_to_sql, generate_er_diagram_dot, Dialect, Error};

fn customers() -> DatabaseSchema {
    DatabaseSchema::new(
        "crm",
        vec![Table::new("customers")
            .with_column(Column::new("id", "INTEGER").primary_key().not_null())
            .with_column(Column::new("email", "VARCHAR(255)").not_null().unique())],
        vec![],
    )
}

#[test]
fn test_sqlite_create_table() {
    let sql = export_schema_to_sql(&customers(), Dialect::Sqlite).unwrap();

    assert!(sql.contains("CREATE TABLE customers ("));
    assert!(sql.contains("id INTEGER NOT NULL"));
    assert!(sql.contains("email TEXT NOT NULL UNIQUE"));
    assert!(sql.contains("PRIMARY KEY (id)"));
}

#[test]
fn test_full_statement_layout() {
    let sql = export_schema_to_sql(&customers(), Dialect::MySql).unwrap();
    let expected = "\
-- Database Schema: crm
-- Generated for MYSQL
-- Tables: 1

-- Table: customers
CREATE TABLE customers (
    id INT NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    PRIMARY KEY (id)
);
";
    assert_eq!(sql, expected);
}

#[rstest]
#[case(Dialect::MySql)]
#[case(Dialect::PostgreSql)]
#[case(Dialect::Sqlite)]
fn test_export_is_deterministic(#[case] dialect: Dialect) {
    let schema = sample_ecommerce_schema();
    assert_eq!(
        export_schema_to_sql(&schema, dialect).unwrap(),
        export_schema_to_sql(&schema, dialect).unwrap()
    );
}

#[test]
fn test_foreign_keys_follow_all_tables() {
    let sql = export_schema_to_sql(&sample_ecommerce_schema(), Dialect::PostgreSql).unwrap();

    let last_create = sql.rfind("CREATE TABLE").unwrap();
    let first_alter = sql.find("ALTER TABLE").unwrap();
    assert!(first_alter > last_create);
    assert!(sql.contains("ALTER TABLE orders ADD FOREIGN KEY (customer_id) REFERENCES customers(id);"));
    assert_eq!(sql.matches("ALTER TABLE").count(), 5);
    assert!(sql.contains("-- Product catalog"));
    assert!(sql.contains("stock_quantity INTEGER NOT NULL DEFAULT 0"));
}

#[test]
fn test_text_default_is_quoted() {
    let schema = DatabaseSchema::new(
        "notes",
        vec![Table::new("notes")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("author", "TEXT").default(DefaultValue::Text("o'brien".to_string())))],
        vec![],
    );

    let sql = export_schema_to_sql(&schema, Dialect::Sqlite).unwrap();
    assert!(sql.contains("author TEXT DEFAULT 'o''brien'"));
}

#[rstest]
#[case("oracle")]
#[case("")]
fn test_unsupported_dialect(#[case] name: &str) {
    assert!(matches!(name.parse::<Dialect>(), Err(Error::ExportError(_))));
}

#[test]
fn test_invalid_schema_is_not_exported() {
    let mut schema = customers();
    schema.tables[0].primary_keys.push("tenant_id".to_string());
    assert!(matches!(
        export_schema_to_sql(&schema, Dialect::Sqlite),
        Err(Error::ValidationError(_))
    ));
}

#[test]
fn test_er_diagram() {
    let dot = generate_er_diagram_dot(&sample_ecommerce_schema());

    assert!(dot.starts_with("digraph ER_Diagram {"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(dot.contains("<B>ecommerce_system ER Diagram</B>"));
    assert!(dot.contains("id (INTEGER) [PK]"));
    assert!(dot.contains("customer_id (INTEGER) [FK]"));
    assert!(dot.contains("email (VARCHAR(255))</TD>"));
    assert!(dot.contains("\"customers\" -> \"orders\" [label=\"one\\nto\\nmany\"];"));
    assert_eq!(dot, generate_er_diagram_dot(&sample_ecommerce_schema()));
}
