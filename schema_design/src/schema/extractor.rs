//! Database schema extractor
//!
//! Reads the catalog of a live database into a `DatabaseSchema`. Only catalog
//! queries are issued; the source is never modified.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, MySql, Pool, Postgres, Row, Sqlite};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use crate::db::connection::DatabaseConnection;
use crate::error::{Error, Result};
use crate::schema::types::{
    Column, DatabaseSchema, DefaultValue, ForeignKeyRef, Relationship, RelationshipType, Table,
};
use crate::utils::naming::foreign_key_constraint_name;

/// A column as reported by a catalog
#[derive(Debug, Clone)]
pub struct CatalogColumn {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default: Option<DefaultValue>,
    /// 1-based position within the primary key
    pub key_position: Option<u32>,
    pub unique: bool,
}

/// A foreign key as reported by a catalog
#[derive(Debug, Clone)]
pub struct CatalogForeignKey {
    pub source_column: String,
    pub target_table: String,
    /// `None` when the key implicitly targets the primary key
    pub target_column: Option<String>,
    /// 0-based position of the column within its (possibly composite) key
    pub position: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub name: String,
    pub definition: String,
}

/// Read-only access to a relational catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// User tables, in catalog order
    async fn table_names(&self) -> Result<Vec<String>>;

    /// Column definitions of a table, in declaration order
    async fn columns(&self, table: &str) -> Result<Vec<CatalogColumn>>;

    async fn foreign_keys(&self, table: &str) -> Result<Vec<CatalogForeignKey>>;

    /// Secondary indexes of a table
    async fn indexes(&self, table: &str) -> Result<Vec<CatalogIndex>>;

    async fn views(&self) -> Result<Vec<CatalogView>>;

    /// Tables kept by the engine or by tooling rather than by the user
    fn is_system_table(&self, name: &str) -> bool {
        name == "_sqlx_migrations"
    }
}

/// Spelling the catalog uses for `name`, matched case-insensitively when no
/// exact match exists
fn canonical_name<'a>(names: impl Iterator<Item = &'a str> + Clone, name: &str) -> Option<&'a str> {
    names
        .clone()
        .find(|n| *n == name)
        .or_else(|| names.into_iter().find(|n| n.eq_ignore_ascii_case(name)))
}

/// Build a schema from a catalog.
///
/// Every foreign key becomes a `many-to-one` relationship. The result must be
/// internally consistent; a catalog declaring keys into missing tables fails
/// the whole extraction.
pub async fn read_schema<C: Catalog + ?Sized>(catalog: &C, name: &str) -> Result<DatabaseSchema> {
    let mut tables = Vec::new();
    let mut declared_keys = Vec::new();
    let mut schema_indexes = Vec::new();

    for table_name in catalog.table_names().await? {
        if catalog.is_system_table(&table_name) {
            continue;
        }

        let columns = catalog.columns(&table_name).await?;
        let indexes = catalog.indexes(&table_name).await?;
        let foreign_keys = catalog.foreign_keys(&table_name).await?;

        let unique_columns: HashSet<&str> = indexes
            .iter()
            .filter(|idx| idx.unique && idx.columns.len() == 1)
            .map(|idx| idx.columns[0].as_str())
            .collect();

        let mut table = Table::new(&table_name);
        let mut key_columns = Vec::new();
        for col in &columns {
            let mut column = Column::new(&col.name, &col.data_type).nullable(!col.not_null);
            column.primary_key = col.key_position.is_some();
            column.unique = col.unique || unique_columns.contains(col.name.as_str());
            column.default_value = col.default.clone();
            if let Some(position) = col.key_position {
                key_columns.push((position, col.name.clone()));
            }
            table.columns.push(column);
        }
        key_columns.sort_by_key(|(position, _)| *position);
        table.primary_keys = key_columns.into_iter().map(|(_, name)| name).collect();
        table.indexes = indexes.iter().map(|idx| idx.name.clone()).collect();

        for index in &indexes {
            schema_indexes.push(serde_json::to_value(index)?);
        }

        tracing::debug!(
            table = %table_name,
            columns = table.columns.len(),
            foreign_keys = foreign_keys.len(),
            "Read table definition"
        );

        declared_keys.push(foreign_keys);
        tables.push(table);
    }

    // Keys are resolved once every table's primary key is known
    let mut relationships = Vec::new();
    for (position, foreign_keys) in declared_keys.into_iter().enumerate() {
        for fk in foreign_keys {
            // SQLite reports targets as written in the DDL, in any letter case
            let target = canonical_name(tables.iter().map(|t| t.name.as_str()), &fk.target_table)
                .and_then(|name| tables.iter().find(|t| t.name == name));
            let target_table = target.map_or(fk.target_table.clone(), |t| t.name.clone());

            let target_column = match (&fk.target_column, target) {
                (Some(column), Some(target)) => {
                    canonical_name(target.columns.iter().map(|c| c.name.as_str()), column)
                        .unwrap_or(column)
                        .to_string()
                }
                (Some(column), None) => column.clone(),
                // an implicit target is the key column at the same position
                (None, target) => target
                    .and_then(|t| t.primary_keys.get(fk.position as usize).cloned())
                    .ok_or_else(|| {
                        Error::extraction(format!(
                            "Cannot resolve target column of foreign key {}.{} -> {}",
                            tables[position].name, fk.source_column, fk.target_table
                        ))
                    })?,
            };

            let table = &mut tables[position];
            relationships.push(
                Relationship::new(
                    &table.name,
                    &fk.source_column,
                    &target_table,
                    &target_column,
                    RelationshipType::ManyToOne,
                )
                .named(&foreign_key_constraint_name(&table.name, &fk.source_column)),
            );
            table.add_foreign_key(ForeignKeyRef::new(
                &fk.source_column,
                &target_table,
                &target_column,
            ));
        }
    }

    let mut schema = DatabaseSchema::new(name, tables, relationships);
    schema.indexes = schema_indexes;
    schema.views = catalog
        .views()
        .await?
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, serde_json::Error>>()?;

    schema.validate().map_err(|e| {
        Error::extraction(format!("Catalog of '{}' is inconsistent: {}", name, e))
    })?;

    tracing::info!(
        schema = name,
        tables = schema.tables.len(),
        relationships = schema.relationships.len(),
        "Analyzed database schema"
    );

    Ok(schema)
}

/// Run a catalog read with an upper time bound
pub async fn with_timeout<F>(timeout: Duration, name: &str, read: F) -> Result<DatabaseSchema>
where
    F: Future<Output = Result<DatabaseSchema>>,
{
    match tokio::time::timeout(timeout, read).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(schema = name, timeout_ms = timeout.as_millis() as u64, "Catalog read timed out");
            Err(Error::extraction(format!(
                "Timed out after {:?} reading the catalog of '{}'",
                timeout, name
            )))
        }
    }
}

/// Schema extractor over a caller-owned connection
pub struct SchemaExtractor<'a> {
    connection: &'a DatabaseConnection,
    timeout: Duration,
}

impl<'a> SchemaExtractor<'a> {
    /// Create a new schema extractor
    pub fn new(connection: &'a DatabaseConnection, timeout: Duration) -> Self {
        Self {
            connection,
            timeout,
        }
    }

    /// Extract the current database schema under the given name
    pub async fn extract(&self, name: &str) -> Result<DatabaseSchema> {
        tracing::debug!(driver = self.connection.driver(), schema = name, "Extracting schema");

        match self.connection {
            DatabaseConnection::Postgres(pool) => {
                with_timeout(self.timeout, name, read_schema(&PostgresCatalog { pool }, name)).await
            }
            DatabaseConnection::MySql(pool) => {
                with_timeout(self.timeout, name, read_schema(&MySqlCatalog { pool }, name)).await
            }
            DatabaseConnection::Sqlite(pool) => {
                with_timeout(self.timeout, name, read_schema(&SqliteCatalog { pool }, name)).await
            }
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite catalog backed by `sqlite_master` and table pragmas
pub struct SqliteCatalog<'a> {
    pub pool: &'a Pool<Sqlite>,
}

#[async_trait]
impl<'a> Catalog for SqliteCatalog<'a> {
    async fn table_names(&self) -> Result<Vec<String>> {
        let sql = r#"SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'"#;
        let rows = sqlx::query(sql).fetch_all(self.pool).await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(Error::from))
            .collect()
    }

    async fn columns(&self, table: &str) -> Result<Vec<CatalogColumn>> {
        let pragma = format!("PRAGMA table_info({})", quote_identifier(table));
        let rows = sqlx::query(&pragma).fetch_all(self.pool).await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            let data_type: String = row.try_get("type")?;
            let notnull: i64 = row.try_get("notnull")?;
            let dflt_value: Option<String> = row.try_get("dflt_value")?;
            let pk: i64 = row.try_get("pk")?;

            columns.push(CatalogColumn {
                name,
                data_type,
                not_null: notnull != 0,
                default: dflt_value.as_deref().map(DefaultValue::from_catalog_literal),
                key_position: (pk > 0).then_some(pk as u32),
                unique: false,
            });
        }

        Ok(columns)
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<CatalogForeignKey>> {
        let pragma = format!("PRAGMA foreign_key_list({})", quote_identifier(table));
        let rows = sqlx::query(&pragma).fetch_all(self.pool).await?;

        let mut foreign_keys = Vec::with_capacity(rows.len());
        for row in rows {
            let seq: i64 = row.try_get("seq")?;
            foreign_keys.push(CatalogForeignKey {
                target_table: row.try_get("table")?,
                source_column: row.try_get("from")?,
                target_column: row.try_get("to")?,
                position: seq as u32,
            });
        }

        Ok(foreign_keys)
    }

    async fn indexes(&self, table: &str) -> Result<Vec<CatalogIndex>> {
        let pragma = format!("PRAGMA index_list({})", quote_identifier(table));
        let rows = sqlx::query(&pragma).fetch_all(self.pool).await?;

        let mut indexes = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            let unique: i64 = row.try_get("unique")?;
            let origin: String = row.try_get("origin")?;

            let info = format!("PRAGMA index_info({})", quote_identifier(&name));
            let columns = sqlx::query(&info)
                .fetch_all(self.pool)
                .await?
                .iter()
                .filter_map(|r| r.try_get::<Option<String>, _>("name").ok().flatten())
                .collect();

            indexes.push(CatalogIndex {
                name,
                table: table.to_string(),
                columns,
                // the primary key's own index does not make its column UNIQUE
                unique: unique != 0 && origin != "pk",
            });
        }

        Ok(indexes)
    }

    async fn views(&self) -> Result<Vec<CatalogView>> {
        let sql = r#"SELECT name, sql FROM sqlite_master WHERE type = 'view'"#;
        let rows = sqlx::query(sql).fetch_all(self.pool).await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(CatalogView {
                name: row.try_get("name")?,
                definition: row.try_get::<Option<String>, _>("sql")?.unwrap_or_default(),
            });
        }

        Ok(views)
    }

    fn is_system_table(&self, name: &str) -> bool {
        name.starts_with("sqlite_") || name == "_sqlx_migrations"
    }
}

#[derive(FromRow)]
struct TableRow {
    table_name: String,
}

#[derive(FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: String,
    column_default: Option<String>,
    key_position: Option<i64>,
}

#[derive(FromRow)]
struct ForeignKeyRow {
    column_name: String,
    ref_table: String,
    ref_column: String,
    /// 1-based
    key_position: i64,
}

fn foreign_keys_from_rows(rows: Vec<ForeignKeyRow>) -> Vec<CatalogForeignKey> {
    rows.into_iter()
        .map(|row| CatalogForeignKey {
            source_column: row.column_name,
            target_table: row.ref_table,
            target_column: Some(row.ref_column),
            position: row.key_position.saturating_sub(1) as u32,
        })
        .collect()
}

#[derive(FromRow)]
struct IndexRow {
    index_name: String,
    column_name: String,
    is_unique: bool,
}

#[derive(FromRow)]
struct ViewRow {
    table_name: String,
    view_definition: Option<String>,
}

/// Group per-column index rows into indexes, keeping row order
fn group_indexes(table: &str, rows: Vec<IndexRow>) -> Vec<CatalogIndex> {
    let mut indexes: Vec<CatalogIndex> = Vec::new();
    for row in rows {
        match indexes.last_mut() {
            Some(index) if index.name == row.index_name => index.columns.push(row.column_name),
            _ => indexes.push(CatalogIndex {
                name: row.index_name,
                table: table.to_string(),
                columns: vec![row.column_name],
                unique: row.is_unique,
            }),
        }
    }
    indexes
}

fn views_from_rows(rows: Vec<ViewRow>) -> Vec<CatalogView> {
    rows.into_iter()
        .map(|row| CatalogView {
            name: row.table_name,
            definition: row.view_definition.unwrap_or_default(),
        })
        .collect()
}

/// PostgreSQL catalog over the current schema
pub struct PostgresCatalog<'a> {
    pub pool: &'a Pool<Postgres>,
}

#[async_trait]
impl<'a> Catalog for PostgresCatalog<'a> {
    async fn table_names(&self) -> Result<Vec<String>> {
        let sql = r#"
            SELECT table_name::text AS table_name
            FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        let rows = sqlx::query_as::<_, TableRow>(sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(|r| r.table_name).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<CatalogColumn>> {
        let sql = r#"
            SELECT
                c.column_name::text AS column_name,
                CASE WHEN c.character_maximum_length IS NOT NULL
                     THEN c.data_type::text || '(' || c.character_maximum_length::text || ')'
                     ELSE c.data_type::text
                END AS data_type,
                c.is_nullable::text AS is_nullable,
                c.column_default::text AS column_default,
                k.ordinal_position::bigint AS key_position
            FROM information_schema.columns c
            LEFT JOIN information_schema.table_constraints tc
                ON tc.table_schema = c.table_schema
                AND tc.table_name = c.table_name
                AND tc.constraint_type = 'PRIMARY KEY'
            LEFT JOIN information_schema.key_column_usage k
                ON k.constraint_name = tc.constraint_name
                AND k.table_schema = tc.table_schema
                AND k.column_name = c.column_name
            WHERE c.table_schema = current_schema() AND c.table_name = $1
            ORDER BY c.ordinal_position
        "#;

        let rows = sqlx::query_as::<_, ColumnRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|col| CatalogColumn {
                name: col.column_name,
                data_type: col.data_type,
                not_null: col.is_nullable != "YES",
                default: col.column_default.as_deref().map(DefaultValue::from_catalog_literal),
                key_position: col.key_position.map(|p| p as u32),
                unique: false,
            })
            .collect())
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<CatalogForeignKey>> {
        let sql = r#"
            SELECT
                src.attname::text AS column_name,
                ref_t.relname::text AS ref_table,
                ref.attname::text AS ref_column,
                k.ord::bigint AS key_position
            FROM pg_constraint con
            JOIN pg_class t ON t.oid = con.conrelid
            JOIN pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_class ref_t ON ref_t.oid = con.confrelid
            CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
                WITH ORDINALITY AS k(src_attnum, ref_attnum, ord)
            JOIN pg_attribute src ON src.attrelid = con.conrelid AND src.attnum = k.src_attnum
            JOIN pg_attribute ref ON ref.attrelid = con.confrelid AND ref.attnum = k.ref_attnum
            WHERE con.contype = 'f'
                AND n.nspname = current_schema()
                AND t.relname = $1
            ORDER BY con.conname, k.ord
        "#;

        let rows = sqlx::query_as::<_, ForeignKeyRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await?;

        Ok(foreign_keys_from_rows(rows))
    }

    async fn indexes(&self, table: &str) -> Result<Vec<CatalogIndex>> {
        let sql = r#"
            SELECT
                i.relname::text AS index_name,
                a.attname::text AS column_name,
                ix.indisunique AS is_unique
            FROM pg_index ix
            JOIN pg_class i ON i.oid = ix.indexrelid
            JOIN pg_class t ON t.oid = ix.indrelid
            JOIN pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
            WHERE t.relname = $1
                AND n.nspname = current_schema()
                AND NOT ix.indisprimary
            ORDER BY i.relname, array_position(ix.indkey::int2[], a.attnum)
        "#;

        let rows = sqlx::query_as::<_, IndexRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await?;

        Ok(group_indexes(table, rows))
    }

    async fn views(&self) -> Result<Vec<CatalogView>> {
        let sql = r#"
            SELECT table_name::text AS table_name, view_definition::text AS view_definition
            FROM information_schema.views
            WHERE table_schema = current_schema()
            ORDER BY table_name
        "#;

        let rows = sqlx::query_as::<_, ViewRow>(sql).fetch_all(self.pool).await?;
        Ok(views_from_rows(rows))
    }
}

/// MySQL catalog over the connection's default database
pub struct MySqlCatalog<'a> {
    pub pool: &'a Pool<MySql>,
}

#[derive(FromRow)]
struct MySqlColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: String,
    column_default: Option<String>,
    column_key: String,
    extra: String,
    key_position: Option<i64>,
}

#[derive(FromRow)]
struct MySqlIndexRow {
    index_name: String,
    column_name: String,
    non_unique: i64,
}

#[async_trait]
impl<'a> Catalog for MySqlCatalog<'a> {
    async fn table_names(&self) -> Result<Vec<String>> {
        let sql = r#"
            SELECT CAST(table_name AS CHAR) AS table_name
            FROM information_schema.tables
            WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        let rows = sqlx::query_as::<_, TableRow>(sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(|r| r.table_name).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<CatalogColumn>> {
        let sql = r#"
            SELECT
                CAST(c.column_name AS CHAR) AS column_name,
                CAST(c.column_type AS CHAR) AS data_type,
                CAST(c.is_nullable AS CHAR) AS is_nullable,
                CAST(c.column_default AS CHAR) AS column_default,
                CAST(c.column_key AS CHAR) AS column_key,
                CAST(c.extra AS CHAR) AS extra,
                CAST(k.ordinal_position AS SIGNED) AS key_position
            FROM information_schema.columns c
            LEFT JOIN information_schema.key_column_usage k
                ON k.table_schema = c.table_schema
                AND k.table_name = c.table_name
                AND k.column_name = c.column_name
                AND k.constraint_name = 'PRIMARY'
            WHERE c.table_schema = DATABASE() AND c.table_name = ?
            ORDER BY c.ordinal_position
        "#;

        let rows = sqlx::query_as::<_, MySqlColumnRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|col| {
                // MySQL reports string defaults unquoted; generated ones are flagged in `extra`
                let default = col.column_default.map(|raw| {
                    if col.extra.contains("DEFAULT_GENERATED") {
                        DefaultValue::Expression { expr: raw }
                    } else if let Ok(value) = raw.parse::<i64>() {
                        DefaultValue::Integer(value)
                    } else if let Some(value) = raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
                        DefaultValue::Float(value)
                    } else {
                        DefaultValue::Text(raw)
                    }
                });

                CatalogColumn {
                    name: col.column_name,
                    data_type: col.data_type,
                    not_null: col.is_nullable != "YES",
                    default,
                    key_position: col.key_position.map(|p| p as u32),
                    unique: col.column_key == "UNI",
                }
            })
            .collect())
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<CatalogForeignKey>> {
        let sql = r#"
            SELECT
                CAST(column_name AS CHAR) AS column_name,
                CAST(referenced_table_name AS CHAR) AS ref_table,
                CAST(referenced_column_name AS CHAR) AS ref_column,
                CAST(ordinal_position AS SIGNED) AS key_position
            FROM information_schema.key_column_usage
            WHERE table_schema = DATABASE()
                AND table_name = ?
                AND referenced_table_name IS NOT NULL
            ORDER BY constraint_name, ordinal_position
        "#;

        let rows = sqlx::query_as::<_, ForeignKeyRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await?;

        Ok(foreign_keys_from_rows(rows))
    }

    async fn indexes(&self, table: &str) -> Result<Vec<CatalogIndex>> {
        let sql = r#"
            SELECT
                CAST(index_name AS CHAR) AS index_name,
                CAST(column_name AS CHAR) AS column_name,
                CAST(non_unique AS SIGNED) AS non_unique
            FROM information_schema.statistics
            WHERE table_schema = DATABASE()
                AND table_name = ?
                AND index_name <> 'PRIMARY'
            ORDER BY index_name, seq_in_index
        "#;

        let rows = sqlx::query_as::<_, MySqlIndexRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await?;

        let rows = rows
            .into_iter()
            .map(|row| IndexRow {
                index_name: row.index_name,
                column_name: row.column_name,
                is_unique: row.non_unique == 0,
            })
            .collect();

        Ok(group_indexes(table, rows))
    }

    async fn views(&self) -> Result<Vec<CatalogView>> {
        let sql = r#"
            SELECT
                CAST(table_name AS CHAR) AS table_name,
                CAST(view_definition AS CHAR) AS view_definition
            FROM information_schema.views
            WHERE table_schema = DATABASE()
            ORDER BY table_name
        "#;

        let rows = sqlx::query_as::<_, ViewRow>(sql).fetch_all(self.pool).await?;
        Ok(views_from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_row(index: &str, column: &str, unique: bool) -> IndexRow {
        IndexRow {
            index_name: index.to_string(),
            column_name: column.to_string(),
            is_unique: unique,
        }
    }

    #[test]
    fn test_group_indexes_keeps_column_order() {
        let indexes = group_indexes(
            "orders",
            vec![
                index_row("ix_orders_customer_date", "customer_id", false),
                index_row("ix_orders_customer_date", "order_date", false),
                index_row("ux_orders_reference", "reference", true),
            ],
        );

        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].columns, vec!["customer_id", "order_date"]);
        assert!(!indexes[0].unique);
        assert!(indexes[1].unique);
    }

    #[test]
    fn test_canonical_name() {
        let names = ["customers", "Orders", "orders"];
        assert_eq!(canonical_name(names.iter().copied(), "orders"), Some("orders"));
        assert_eq!(canonical_name(names.iter().copied(), "CUSTOMERS"), Some("customers"));
        assert_eq!(canonical_name(names.iter().copied(), "ORDERS"), Some("Orders"));
        assert_eq!(canonical_name(names.iter().copied(), "invoices"), None);
    }

    #[test]
    fn test_foreign_key_positions_are_zero_based() {
        let rows = vec![
            ForeignKeyRow {
                column_name: "a".to_string(),
                ref_table: "t".to_string(),
                ref_column: "x".to_string(),
                key_position: 1,
            },
            ForeignKeyRow {
                column_name: "b".to_string(),
                ref_table: "t".to_string(),
                ref_column: "y".to_string(),
                key_position: 2,
            },
        ];

        let keys = foreign_keys_from_rows(rows);
        assert_eq!(keys.len(), 2);
        assert_eq!((keys[1].source_column.as_str(), keys[1].position), ("b", 1));
        assert_eq!(keys[1].target_column.as_deref(), Some("y"));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("order items"), "\"order items\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
