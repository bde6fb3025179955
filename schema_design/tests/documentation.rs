use std::fs;

use pretty_assertions::assert_eq;

use schema_design::schema::samples::sample_ecommerce_schema;
use schema_design::schema::types::{Column, DatabaseSchema, Table};
use schema_design::{generate_normalized_schema, DocumentationWriter, Error};

fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_writes_six_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("docs");

    let bundle = DocumentationWriter::new(&output)
        .write(&sample_ecommerce_schema())
        .unwrap();

    assert_eq!(bundle.files().len(), 6);
    assert_eq!(
        file_names(&output),
        vec![
            "ecommerce_system_er_diagram.dot",
            "ecommerce_system_mysql.sql",
            "ecommerce_system_normalization_analysis.json",
            "ecommerce_system_postgresql.sql",
            "ecommerce_system_schema.json",
            "ecommerce_system_sqlite.sql",
        ]
    );

    let json = fs::read_to_string(&bundle.schema_json).unwrap();
    let parsed: DatabaseSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, sample_ecommerce_schema());

    let analysis: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&bundle.normalization_analysis).unwrap()).unwrap();
    assert_eq!(analysis["first_normal_form"]["compliant"], true);
}

#[test]
fn test_rerun_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let writer = DocumentationWriter::new(dir.path());
    let schema = sample_ecommerce_schema();

    writer.write(&schema).unwrap();
    let bundle = writer.write(&schema).unwrap();

    assert_eq!(file_names(dir.path()).len(), 6);
    assert!(fs::read_to_string(&bundle.sql[2].1)
        .unwrap()
        .starts_with("-- Database Schema: ecommerce_system\n-- Generated for SQLITE"));
}

#[test]
fn test_normalized_bundle_alongside() {
    let dir = tempfile::tempdir().unwrap();
    let writer = DocumentationWriter::new(dir.path());
    let schema = sample_ecommerce_schema();

    writer.write(&schema).unwrap();
    writer.write(&generate_normalized_schema(&schema).unwrap()).unwrap();

    let names = file_names(dir.path());
    assert_eq!(names.len(), 12);
    assert!(names.contains(&"ecommerce_system_normalized_schema.json".to_string()));
}

#[test]
fn test_invalid_schema_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("docs");
    let schema = DatabaseSchema::new(
        "broken",
        vec![Table::new("orders")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("customer_id", "INTEGER").references("customers", "id"))],
        vec![],
    );

    let result = DocumentationWriter::new(&output).write(&schema);
    assert!(matches!(result, Err(Error::ValidationError(_))));
    assert!(!output.exists());
}

#[test]
fn test_unwritable_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let result = DocumentationWriter::new(blocker.join("docs")).write(&sample_ecommerce_schema());
    assert!(matches!(result, Err(Error::ExportError(msg)) if msg.contains("docs")));
}
