//! Schema exporter
//!
//! Renders a schema as SQL DDL for a target dialect and as a Graphviz ER
//! diagram. Output is byte-for-byte deterministic for a given schema.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::schema::types::{Column, DatabaseSchema, Table};

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    PostgreSql,
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::MySql, Dialect::PostgreSql, Dialect::Sqlite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Logical type spellings for this dialect
    pub fn type_mappings(&self) -> &'static [TypeMapping] {
        match self {
            Dialect::MySql => MYSQL_TYPES,
            Dialect::PostgreSql => POSTGRESQL_TYPES,
            Dialect::Sqlite => SQLITE_TYPES,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSql),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(Error::ExportError(format!(
                "Unsupported SQL dialect: {} (expected mysql, postgresql or sqlite)",
                other
            ))),
        }
    }
}

/// Spelling of a logical type in one dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub logical: &'static str,
    pub spelling: &'static str,
    /// Keep a `(length)` suffix from the source type
    pub keep_params: bool,
}

const fn mapping(logical: &'static str, spelling: &'static str, keep_params: bool) -> TypeMapping {
    TypeMapping {
        logical,
        spelling,
        keep_params,
    }
}

pub const MYSQL_TYPES: &[TypeMapping] = &[
    mapping("INTEGER", "INT", false),
    mapping("TEXT", "TEXT", false),
    mapping("REAL", "DECIMAL(10,2)", false),
    mapping("BLOB", "BLOB", false),
    mapping("VARCHAR", "VARCHAR", true),
];

pub const POSTGRESQL_TYPES: &[TypeMapping] = &[
    mapping("INTEGER", "INTEGER", false),
    mapping("TEXT", "TEXT", false),
    mapping("REAL", "DECIMAL", false),
    mapping("BLOB", "BYTEA", false),
    mapping("VARCHAR", "VARCHAR", true),
];

pub const SQLITE_TYPES: &[TypeMapping] = &[
    mapping("INTEGER", "INTEGER", false),
    mapping("TEXT", "TEXT", false),
    mapping("REAL", "REAL", false),
    mapping("BLOB", "BLOB", false),
    mapping("VARCHAR", "TEXT", false),
];

/// `VARCHAR(255)` -> base `VARCHAR`, params `(255)`
static TYPE_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_ ]*?)\s*(\([^)]*\))?\s*$").ok());

/// Spell a source type in the target dialect; unknown types pass through verbatim
pub fn map_data_type(data_type: &str, dialect: Dialect) -> String {
    let captures = match TYPE_PATTERN.as_ref().and_then(|re| re.captures(data_type)) {
        Some(captures) => captures,
        None => return data_type.to_string(),
    };
    let base = captures.get(1).map_or("", |m| m.as_str()).to_uppercase();
    let params = captures.get(2).map_or("", |m| m.as_str());

    match dialect.type_mappings().iter().find(|m| m.logical == base) {
        Some(m) if m.keep_params => format!("{}{}", m.spelling, params),
        Some(m) => m.spelling.to_string(),
        None => data_type.to_string(),
    }
}

fn column_definition(column: &Column, dialect: Dialect) -> String {
    let mut definition = format!("    {} {}", column.name, map_data_type(&column.data_type, dialect));

    if !column.nullable {
        definition.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default_value {
        definition.push_str(&format!(" DEFAULT {}", default));
    }
    if column.unique {
        definition.push_str(" UNIQUE");
    }

    definition
}

fn create_table_statement(table: &Table, dialect: Dialect) -> String {
    let mut definitions: Vec<String> = table
        .columns
        .iter()
        .map(|column| column_definition(column, dialect))
        .collect();

    if !table.primary_keys.is_empty() {
        definitions.push(format!("    PRIMARY KEY ({})", table.primary_keys.join(", ")));
    }

    format!("CREATE TABLE {} (\n{}\n);\n", table.name, definitions.join(",\n"))
}

/// Export the schema as `CREATE TABLE` statements followed by foreign keys
pub fn export_schema_to_sql(schema: &DatabaseSchema, dialect: Dialect) -> Result<String> {
    schema.validate()?;

    let mut statements = vec![
        format!("-- Database Schema: {}", schema.name),
        format!("-- Generated for {}", dialect.as_str().to_uppercase()),
        format!("-- Tables: {}", schema.tables.len()),
        String::new(),
    ];

    for table in &schema.tables {
        statements.push(format!("-- Table: {}", table.name));
        if !table.description.is_empty() {
            statements.push(format!("-- {}", table.description));
        }
        statements.push(create_table_statement(table, dialect));
    }

    // Constraints come last so every referenced table already exists
    for table in &schema.tables {
        for fk in &table.foreign_keys {
            statements.push(format!(
                "ALTER TABLE {} ADD FOREIGN KEY ({}) REFERENCES {}({});",
                table.name, fk.source_column, fk.target_table, fk.target_column
            ));
        }
    }

    tracing::debug!(schema = %schema.name, dialect = %dialect, "Exported schema to SQL");

    Ok(statements.join("\n"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn node_id(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render the schema as a Graphviz digraph.
///
/// Columns are listed as `name (type)` with a ` [PK]` or ` [FK]` marker;
/// relationship edges are labeled with their cardinality.
pub fn generate_er_diagram_dot(schema: &DatabaseSchema) -> String {
    let mut dot = String::new();

    dot.push_str("digraph ER_Diagram {\n");
    dot.push_str("    rankdir=TB;\n");
    dot.push_str("    node [shape=plaintext];\n\n");
    dot.push_str("    // Title\n");
    dot.push_str(&format!(
        "    schema_title [label=<<B>{} ER Diagram</B>>, shape=plaintext, fontsize=16];\n",
        escape_html(&schema.name)
    ));

    for table in &schema.tables {
        dot.push_str(&format!("\n    // Table: {}\n", table.name));
        dot.push_str(&format!("    {} [label=<\n", node_id(&table.name)));
        dot.push_str("        <TABLE BORDER=\"1\" CELLBORDER=\"0\" CELLSPACING=\"0\">\n");
        dot.push_str(&format!(
            "            <TR><TD BGCOLOR=\"lightblue\"><B>{}</B></TD></TR>\n",
            escape_html(&table.name.to_uppercase())
        ));

        for column in &table.columns {
            let key_indicator = if column.primary_key || table.is_key_column(&column.name) {
                " [PK]"
            } else if column.foreign_key.is_some() {
                " [FK]"
            } else {
                ""
            };

            dot.push_str(&format!(
                "            <TR><TD ALIGN=\"LEFT\">{} ({}){}</TD></TR>\n",
                escape_html(&column.name),
                escape_html(&column.data_type),
                key_indicator
            ));
        }

        dot.push_str("        </TABLE>\n");
        dot.push_str("    >];\n");
    }

    if !schema.relationships.is_empty() {
        dot.push('\n');
    }
    for relationship in &schema.relationships {
        dot.push_str(&format!(
            "    {} -> {} [label=\"{}\"];\n",
            node_id(&relationship.source_table),
            node_id(&relationship.target_table),
            relationship.relationship_type.as_str().replace('-', "\\n")
        ));
    }

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parsing() {
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
        assert!(matches!("oracle".parse::<Dialect>(), Err(Error::ExportError(_))));
    }

    #[test]
    fn test_map_data_type() {
        assert_eq!(map_data_type("INTEGER", Dialect::MySql), "INT");
        assert_eq!(map_data_type("REAL", Dialect::MySql), "DECIMAL(10,2)");
        assert_eq!(map_data_type("BLOB", Dialect::PostgreSql), "BYTEA");
        assert_eq!(map_data_type("VARCHAR(255)", Dialect::Sqlite), "TEXT");
        assert_eq!(map_data_type("varchar(100)", Dialect::MySql), "VARCHAR(100)");
        assert_eq!(map_data_type("VARCHAR(20)", Dialect::PostgreSql), "VARCHAR(20)");
        assert_eq!(map_data_type("TIMESTAMP", Dialect::Sqlite), "TIMESTAMP");
        assert_eq!(map_data_type("DECIMAL(10,2)", Dialect::Sqlite), "DECIMAL(10,2)");
        assert_eq!(map_data_type("character varying(40)", Dialect::MySql), "character varying(40)");
    }

    #[test]
    fn test_unmapped_types_pass_through_verbatim() {
        assert_eq!(map_data_type("jsonb", Dialect::PostgreSql), "jsonb");
        assert_eq!(map_data_type("", Dialect::Sqlite), "");
    }
}
