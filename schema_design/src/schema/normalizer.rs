//! Schema normalizer
//!
//! Derives a normalized schema by moving enum-like columns into lookup tables.
//! The input schema is never modified.

use std::collections::HashMap;

use crate::error::Result;
use crate::schema::rules::{matching_token, ENUM_TOKENS};
use crate::schema::types::{
    split_reference, Column, DatabaseSchema, ForeignKeyRef, Relationship, RelationshipType, Table,
};
use crate::utils::naming::{
    foreign_key_constraint_name, generate_unique_name, lookup_table_name, title,
};

/// `(table, column)` moved to `(lookup table, lookup column)`
type Relocations = HashMap<(String, String), (String, String)>;

/// A column to be moved into a lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCandidate<'a> {
    pub column: &'a str,
    pub token: &'static str,
}

/// Enum-like columns of a table, in column order.
///
/// Each token claims the first non-key column containing it that no earlier
/// token has claimed.
pub fn identify_lookup_columns(table: &Table) -> Vec<LookupCandidate<'_>> {
    let mut claimed: Vec<LookupCandidate<'_>> = Vec::new();

    for &token in ENUM_TOKENS {
        let found = table.columns.iter().find(|c| {
            !c.primary_key
                && !table.is_key_column(&c.name)
                && matching_token(&c.name, &[token]).is_some()
                && !claimed.iter().any(|x| x.column == c.name)
        });
        if let Some(column) = found {
            claimed.push(LookupCandidate {
                column: &column.name,
                token,
            });
        }
    }

    claimed.sort_by_key(|c| table.columns.iter().position(|col| col.name == c.column));
    claimed
}

/// Produce `<name>_normalized` with lookup tables extracted.
///
/// Relationships and foreign keys that pointed at a moved column are
/// re-pointed to the lookup table's value column. A relationship whose
/// multi-column side lost columns cannot be re-pointed and is dropped.
pub fn generate_normalized_schema(schema: &DatabaseSchema) -> Result<DatabaseSchema> {
    schema.validate()?;

    let mut taken_names: Vec<String> = schema.tables.iter().map(|t| t.name.clone()).collect();
    let mut relocations = Relocations::new();
    let mut tables = Vec::new();
    let mut lookup_relationships = Vec::new();

    for table in &schema.tables {
        let mut normalized = table.clone();
        normalized.description = format!("{} (normalized)", table.description)
            .trim_start()
            .to_string();

        for candidate in identify_lookup_columns(table) {
            let source = match table.column(candidate.column) {
                Some(column) => column,
                None => continue,
            };

            let lookup_name = generate_unique_name(
                &lookup_table_name(&table.name, candidate.token),
                &taken_names,
            );
            taken_names.push(lookup_name.clone());

            let mut value_column = Column::new(candidate.token, &source.data_type)
                .describe(&format!("{} values", title(candidate.token)));
            value_column.foreign_key = source.foreign_key.clone();

            let mut lookup = Table::new(&lookup_name)
                .with_description(&format!("Lookup table for {}", table.name))
                .with_column(Column::new("id", "INTEGER").primary_key().not_null())
                .with_column(value_column);
            for fk in table
                .foreign_keys
                .iter()
                .filter(|fk| fk.source_column == source.name)
            {
                lookup.foreign_keys.push(ForeignKeyRef::new(
                    candidate.token,
                    &fk.target_table,
                    &fk.target_column,
                ));
            }

            normalized.columns.retain(|c| c.name != source.name);
            normalized.foreign_keys.retain(|fk| fk.source_column != source.name);

            let existing: Vec<String> = normalized.columns.iter().map(|c| c.name.clone()).collect();
            let fk_column = generate_unique_name(&format!("{}_id", lookup_name), &existing);
            normalized.add_column(Column::new(&fk_column, "INTEGER"));
            normalized.add_foreign_key(ForeignKeyRef::new(&fk_column, &lookup_name, "id"));

            lookup_relationships.push(
                Relationship::new(
                    &table.name,
                    &fk_column,
                    &lookup_name,
                    "id",
                    RelationshipType::ManyToOne,
                )
                .named(&foreign_key_constraint_name(&table.name, &fk_column)),
            );

            tracing::debug!(
                table = %table.name,
                column = %source.name,
                lookup = %lookup_name,
                "Extracted lookup table"
            );

            relocations.insert(
                (table.name.clone(), source.name.clone()),
                (lookup_name, candidate.token.to_string()),
            );
            tables.push(lookup);
        }

        tables.push(normalized);
    }

    for table in &mut tables {
        repoint_foreign_keys(table, &relocations);
    }

    let mut relationships = Vec::new();
    for rel in &schema.relationships {
        match repoint_relationship(rel, &relocations) {
            Some(rel) => relationships.push(rel),
            None => tracing::warn!(
                source = %rel.source_table,
                target = %rel.target_table,
                "Dropping relationship whose columns were split across lookup tables"
            ),
        }
    }
    relationships.extend(lookup_relationships);

    let normalized = DatabaseSchema::new(&format!("{}_normalized", schema.name), tables, relationships);
    normalized.validate()?;

    tracing::info!(
        schema = %normalized.name,
        lookup_tables = relocations.len(),
        "Generated normalized schema"
    );

    Ok(normalized)
}

/// Point keys whose target column moved at the lookup table instead
fn repoint_foreign_keys(table: &mut Table, relocations: &Relocations) {
    for fk in &mut table.foreign_keys {
        if let Some((lookup, column)) =
            relocations.get(&(fk.target_table.clone(), fk.target_column.clone()))
        {
            fk.target_table = lookup.clone();
            fk.target_column = column.clone();
        }
    }

    for column in &mut table.columns {
        let moved = column
            .foreign_key
            .as_deref()
            .and_then(split_reference)
            .and_then(|(t, c)| relocations.get(&(t.to_string(), c.to_string())));
        if let Some((lookup, target)) = moved {
            column.foreign_key = Some(format!("{}.{}", lookup, target));
        }
    }
}

fn repoint_relationship(rel: &Relationship, relocations: &Relocations) -> Option<Relationship> {
    let (source_table, source_columns) =
        repoint_side(&rel.source_table, &rel.source_columns, relocations)?;
    let (target_table, target_columns) =
        repoint_side(&rel.target_table, &rel.target_columns, relocations)?;

    Some(Relationship {
        source_table,
        target_table,
        source_columns,
        target_columns,
        relationship_type: rel.relationship_type,
        constraint_name: rel.constraint_name.clone(),
    })
}

fn repoint_side(
    table: &str,
    columns: &[String],
    relocations: &Relocations,
) -> Option<(String, Vec<String>)> {
    let moved: Vec<&(String, String)> = columns
        .iter()
        .filter_map(|c| relocations.get(&(table.to_string(), c.clone())))
        .collect();

    match (moved.as_slice(), columns.len()) {
        ([], _) => Some((table.to_string(), columns.to_vec())),
        ([(lookup, column)], 1) => Some((lookup.clone(), vec![column.clone()])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_column_claimed_once() {
        let table = Table::new("tickets")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("status_type", "TEXT"))
            .with_column(Column::new("ticket_type", "TEXT"))
            .with_column(Column::new("status_note", "TEXT"));

        let candidates = identify_lookup_columns(&table);
        assert_eq!(
            candidates,
            vec![
                LookupCandidate { column: "status_type", token: "status" },
                LookupCandidate { column: "ticket_type", token: "type" },
            ]
        );
    }

    #[test]
    fn test_key_columns_are_not_extracted() {
        let table = Table::new("levels")
            .with_column(Column::new("level", "INTEGER").primary_key())
            .with_column(Column::new("label", "TEXT"));
        assert!(identify_lookup_columns(&table).is_empty());
    }

    #[test]
    fn test_repoint_side() {
        let mut relocations = Relocations::new();
        relocations.insert(
            ("products".to_string(), "category_id".to_string()),
            ("products_categories".to_string(), "category".to_string()),
        );

        assert_eq!(
            repoint_side("products", &["category_id".to_string()], &relocations),
            Some(("products_categories".to_string(), vec!["category".to_string()]))
        );
        assert_eq!(
            repoint_side("products", &["id".to_string()], &relocations),
            Some(("products".to_string(), vec!["id".to_string()]))
        );
        assert_eq!(
            repoint_side(
                "products",
                &["category_id".to_string(), "sku".to_string()],
                &relocations
            ),
            None
        );
    }
}
