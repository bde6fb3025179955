//! Schema module for schema_design
//!
//! This module handles schema extraction, normalization analysis, lookup-table
//! synthesis, and export.

pub mod exporter;
pub mod extractor;
pub mod normalization;
pub mod normalizer;
pub mod patterns;
pub mod rules;
pub mod samples;
pub mod types;

// Re-export key types
pub use exporter::{export_schema_to_sql, generate_er_diagram_dot, Dialect};
pub use extractor::{Catalog, SchemaExtractor};
pub use normalization::{check_normalization_level, NormalizationAnalyzer, NormalizationReport};
pub use normalizer::generate_normalized_schema;
pub use patterns::{detect_design_patterns, PatternMatch};
pub use rules::{NormalForm, NormalizationRule, Violation};
pub use samples::sample_ecommerce_schema;
pub use types::{
    Column, DatabaseSchema, DefaultValue, ForeignKeyRef, Relationship, RelationshipType, Table,
};
