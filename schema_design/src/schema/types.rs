//! Type definitions for database schema objects

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Represents a complete database schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub name: String,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub views: Vec<serde_json::Value>,
    #[serde(default)]
    pub indexes: Vec<serde_json::Value>,
}

impl DatabaseSchema {
    /// Create a new schema from tables and relationships
    pub fn new(name: &str, tables: Vec<Table>, relationships: Vec<Relationship>) -> Self {
        Self {
            name: name.to_string(),
            tables,
            relationships,
            views: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Check the structural invariants of the schema.
    ///
    /// Every key and relationship must point at tables and columns that exist
    /// in this schema, and table and column names must be unique.
    pub fn validate(&self) -> Result<()> {
        let mut table_names = HashSet::new();
        for table in &self.tables {
            if !table_names.insert(table.name.as_str()) {
                return Err(Error::ValidationError(format!(
                    "Duplicate table name: {}",
                    table.name
                )));
            }
            table.validate_columns()?;
        }

        for table in &self.tables {
            for column in &table.columns {
                if let Some(reference) = &column.foreign_key {
                    let (target_table, target_column) =
                        split_reference(reference).ok_or_else(|| {
                            Error::ValidationError(format!(
                                "Column {}.{} has malformed foreign key '{}' (expected table.column)",
                                table.name, column.name, reference
                            ))
                        })?;
                    self.require_column(
                        target_table,
                        target_column,
                        &format!("foreign key of {}.{}", table.name, column.name),
                    )?;
                }
            }

            for fk in &table.foreign_keys {
                if table.column(&fk.source_column).is_none() {
                    return Err(Error::ValidationError(format!(
                        "Foreign key source column {}.{} does not exist",
                        table.name, fk.source_column
                    )));
                }
                self.require_column(
                    &fk.target_table,
                    &fk.target_column,
                    &format!("foreign key of {}.{}", table.name, fk.source_column),
                )?;
            }
        }

        for rel in &self.relationships {
            let context = format!("relationship {} -> {}", rel.source_table, rel.target_table);
            if rel.source_columns.len() != rel.target_columns.len() {
                return Err(Error::ValidationError(format!(
                    "{} pairs {} source columns with {} target columns",
                    context,
                    rel.source_columns.len(),
                    rel.target_columns.len()
                )));
            }
            for column in &rel.source_columns {
                self.require_column(&rel.source_table, column, &context)?;
            }
            for column in &rel.target_columns {
                self.require_column(&rel.target_table, column, &context)?;
            }
        }

        Ok(())
    }

    fn require_column(&self, table: &str, column: &str, context: &str) -> Result<()> {
        let target = self.table(table).ok_or_else(|| {
            Error::ValidationError(format!("{} references missing table '{}'", context, table))
        })?;
        if target.column(column).is_none() {
            return Err(Error::ValidationError(format!(
                "{} references missing column '{}.{}'",
                context, table, column
            )));
        }
        Ok(())
    }
}

/// Split a `table.column` reference
pub fn split_reference(reference: &str) -> Option<(&str, &str)> {
    match reference.rsplit_once('.') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => Some((table, column)),
        _ => None,
    }
}

/// Represents a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRef>,
    #[serde(default)]
    pub indexes: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Table {
    /// Create a new table with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            description: String::new(),
        }
    }

    /// Add a column, recording it as a key column when flagged as such
    pub fn add_column(&mut self, column: Column) {
        if column.primary_key && !self.primary_keys.contains(&column.name) {
            self.primary_keys.push(column.name.clone());
        }
        self.columns.push(column);
    }

    /// Add a column and return the table
    pub fn with_column(mut self, column: Column) -> Self {
        self.add_column(column);
        self
    }

    /// Declare a foreign key, also marking the source column
    pub fn with_foreign_key(mut self, source_column: &str, target_table: &str, target_column: &str) -> Self {
        self.add_foreign_key(ForeignKeyRef::new(source_column, target_table, target_column));
        self
    }

    pub fn add_foreign_key(&mut self, fk: ForeignKeyRef) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.name == fk.source_column) {
            column.foreign_key = Some(fk.reference());
        }
        self.foreign_keys.push(fk);
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether the column belongs to the primary key
    pub fn is_key_column(&self, name: &str) -> bool {
        self.primary_keys.iter().any(|k| k == name)
    }

    fn validate_columns(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::ValidationError(format!(
                    "Duplicate column {}.{}",
                    self.name, column.name
                )));
            }
        }
        for key in &self.primary_keys {
            if !seen.contains(key.as_str()) {
                return Err(Error::ValidationError(format!(
                    "Primary key column {}.{} does not exist",
                    self.name, key
                )));
            }
        }
        Ok(())
    }
}

/// Represents a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Target as `table.column`
    #[serde(default)]
    pub foreign_key: Option<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub default_value: Option<DefaultValue>,
    #[serde(default)]
    pub description: String,
}

fn default_nullable() -> bool {
    true
}

impl Column {
    /// Create a new nullable column with the given name and type
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: true,
            primary_key: false,
            foreign_key: None,
            unique: false,
            default_value: None,
            description: String::new(),
        }
    }

    /// Mark the column as part of the primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set whether the column is nullable
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn not_null(self) -> Self {
        self.nullable(false)
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set a default value for the column
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn references(mut self, table: &str, column: &str) -> Self {
        self.foreign_key = Some(format!("{}.{}", table, column));
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Scalar column default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// SQL expression emitted verbatim, e.g. `CURRENT_TIMESTAMP`
    Expression { expr: String },
}

impl DefaultValue {
    /// Interpret a default as reported by a catalog (`0`, `'active'`, `CURRENT_TIMESTAMP`)
    pub fn from_catalog_literal(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<i64>() {
            return DefaultValue::Integer(value);
        }
        if raw.chars().any(|c| c.is_ascii_digit()) {
            // `1e999` overflows to infinity, which has no SQL literal
            if let Some(value) = raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
                return DefaultValue::Float(value);
            }
        }
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            return DefaultValue::Text(raw[1..raw.len() - 1].replace("''", "'"));
        }
        match raw.to_ascii_uppercase().as_str() {
            "TRUE" => DefaultValue::Boolean(true),
            "FALSE" => DefaultValue::Boolean(false),
            _ => DefaultValue::Expression {
                expr: raw.to_string(),
            },
        }
    }
}

/// Renders the value as a SQL literal
impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Boolean(value) => write!(f, "{}", if *value { "TRUE" } else { "FALSE" }),
            DefaultValue::Integer(value) => write!(f, "{}", value),
            DefaultValue::Float(value) => write!(f, "{}", value),
            DefaultValue::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
            DefaultValue::Expression { expr } => write!(f, "{}", expr),
        }
    }
}

/// Table-level foreign key declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl ForeignKeyRef {
    pub fn new(source_column: &str, target_table: &str, target_column: &str) -> Self {
        Self {
            source_column: source_column.to_string(),
            target_table: target_table.to_string(),
            target_column: target_column.to_string(),
        }
    }

    /// The `table.column` form stored on columns
    pub fn reference(&self) -> String {
        format!("{}.{}", self.target_table, self.target_column)
    }
}

/// Cardinality between two tables, assigned heuristically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "one-to-one",
            RelationshipType::OneToMany => "one-to-many",
            RelationshipType::ManyToOne => "many-to-one",
            RelationshipType::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a relationship between two tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source_table: String,
    pub target_table: String,
    pub source_columns: Vec<String>,
    pub target_columns: Vec<String>,
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub constraint_name: String,
}

impl Relationship {
    /// Single-column relationship
    pub fn new(
        source_table: &str,
        source_column: &str,
        target_table: &str,
        target_column: &str,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            source_table: source_table.to_string(),
            target_table: target_table.to_string(),
            source_columns: vec![source_column.to_string()],
            target_columns: vec![target_column.to_string()],
            relationship_type,
            constraint_name: String::new(),
        }
    }

    pub fn named(mut self, constraint_name: &str) -> Self {
        self.constraint_name = constraint_name.to_string();
        self
    }
}
