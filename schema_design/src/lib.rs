//! schema_design: schema introspection and normalization analysis
//!
//! Reads a relational schema from a live database (or a JSON/YAML file),
//! checks it against heuristic 1NF/2NF/3NF rules, derives a normalized variant
//! with lookup tables, and exports it as SQL DDL for several dialects and as a
//! Graphviz ER diagram.

pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod schema;
pub mod utils;

// Re-export main types for easier access
pub use config::Config;
pub use db::connection::DatabaseConnection;
pub use docs::{DocumentBundle, DocumentationWriter};
pub use error::{Error, Result};
pub use schema::exporter::{export_schema_to_sql, generate_er_diagram_dot, Dialect};
pub use schema::extractor::SchemaExtractor;
pub use schema::normalization::{check_normalization_level, NormalizationReport};
pub use schema::normalizer::generate_normalized_schema;
pub use schema::types::DatabaseSchema;

/// Connect to the configured database, extract its schema and close the
/// connection again
pub async fn extract_schema(config: &config::DatabaseConfig) -> Result<DatabaseSchema> {
    let connection = DatabaseConnection::connect(config).await?;
    let result = SchemaExtractor::new(&connection, config.timeout())
        .extract(&config.schema_name())
        .await;
    connection.close().await;
    result
}
