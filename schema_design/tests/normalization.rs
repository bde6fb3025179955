use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use schema_design::schema::normalization::NormalizationAnalyzer;
use schema_design::schema::rules::{NormalForm, Violation};
use schema_design::schema::samples::sample_ecommerce_schema;
use schema_design::schema::types::{Column, DatabaseSchema, Table};
use schema_design::{check_normalization_level, Error};

fn single_table(table: Table) -> DatabaseSchema {
    DatabaseSchema::new("test", vec![table], vec![])
}

#[fixture]
fn order_items() -> DatabaseSchema {
    single_table(
        Table::new("order_items")
            .with_column(Column::new("order_id", "INTEGER").primary_key().not_null())
            .with_column(Column::new("product_id", "INTEGER").primary_key().not_null())
            .with_column(Column::new("order_date", "TIMESTAMP"))
            .with_column(Column::new("quantity", "INTEGER")),
    )
}

#[rstest]
fn test_partial_dependency_on_composite_key(order_items: DatabaseSchema) {
    let report = check_normalization_level(&order_items).unwrap();

    assert!(!report.is_compliant(NormalForm::Second));
    assert_eq!(
        report.level(NormalForm::Second).violations,
        vec![Violation::new(
            "order_items",
            &["order_date"],
            "Partial dependency on composite key"
        )]
    );
    assert_eq!(
        report.recommendations,
        vec!["Move partially dependent columns to separate tables"]
    );
}

#[test]
fn test_transitive_dependency() {
    let schema = single_table(
        Table::new("products")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("category_id", "INTEGER"))
            .with_column(Column::new("category_name", "TEXT")),
    );

    let report = check_normalization_level(&schema).unwrap();
    let violations = &report.level(NormalForm::Third).violations;

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].table, "products");
    assert_eq!(violations[0].columns, vec!["category_id", "category_name"]);
    assert!(report.is_compliant(NormalForm::First));
    assert!(report.is_compliant(NormalForm::Second));
}

#[rstest]
#[case("tags_json")]
#[case("ItemArray")]
#[case("phone_list")]
#[case("multi_value")]
fn test_non_atomic_names(#[case] column: &str) {
    let schema = single_table(
        Table::new("items")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new(column, "TEXT")),
    );

    let report = check_normalization_level(&schema).unwrap();
    let first = report.level(NormalForm::First);
    assert!(!first.compliant);
    assert_eq!(first.violations[0].columns, vec![column]);
    assert_eq!(first.violations[0].issue, "Potential non-atomic values");
}

#[test]
fn test_first_normal_form_without_trigger_tokens() {
    let report = check_normalization_level(&sample_ecommerce_schema()).unwrap();
    let first = report.level(NormalForm::First);

    assert!(first.compliant);
    assert!(first.violations.is_empty());
}

#[rstest]
fn test_analysis_is_idempotent(order_items: DatabaseSchema) {
    let analyzer = NormalizationAnalyzer::new();
    assert_eq!(
        analyzer.analyze(&order_items).unwrap(),
        analyzer.analyze(&order_items).unwrap()
    );
}

#[test]
fn test_every_level_is_reported() {
    let report = check_normalization_level(&sample_ecommerce_schema()).unwrap();
    let levels: Vec<NormalForm> = report.levels.keys().copied().collect();
    assert_eq!(levels, NormalForm::ALL.to_vec());
}

#[test]
fn test_invalid_schema_is_rejected() {
    let schema = single_table(
        Table::new("orders")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("warehouse_id", "INTEGER").references("nonexistent_table", "id")),
    );

    assert!(matches!(
        check_normalization_level(&schema),
        Err(Error::ValidationError(_))
    ));
}
