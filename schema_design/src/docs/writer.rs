//! Documentation bundle writer

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::schema::exporter::{export_schema_to_sql, generate_er_diagram_dot, Dialect};
use crate::schema::normalization::check_normalization_level;
use crate::schema::types::DatabaseSchema;
use crate::utils::naming::format_file_name;

/// Paths of the files written for one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBundle {
    pub schema_json: PathBuf,
    pub er_diagram: PathBuf,
    /// One DDL file per dialect, in `Dialect::ALL` order
    pub sql: Vec<(Dialect, PathBuf)>,
    pub normalization_analysis: PathBuf,
}

impl DocumentBundle {
    /// Every file in the bundle
    pub fn files(&self) -> Vec<&Path> {
        let mut files = vec![self.schema_json.as_path(), self.er_diagram.as_path()];
        files.extend(self.sql.iter().map(|(_, path)| path.as_path()));
        files.push(self.normalization_analysis.as_path());
        files
    }
}

/// Writes documentation bundles into a directory.
///
/// Files are named `<schema>_<artifact>.<ext>` and overwritten on every run.
pub struct DocumentationWriter {
    directory: PathBuf,
}

impl DocumentationWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Render every artifact for `schema` and write the bundle.
    ///
    /// All artifacts are rendered before the first file is written, so an
    /// invalid schema leaves the directory untouched.
    pub fn write(&self, schema: &DatabaseSchema) -> Result<DocumentBundle> {
        let schema_json = serde_json::to_string_pretty(schema)?;
        let analysis = serde_json::to_string_pretty(&check_normalization_level(schema)?)?;
        let diagram = generate_er_diagram_dot(schema);
        let mut ddl = Vec::with_capacity(Dialect::ALL.len());
        for dialect in Dialect::ALL {
            ddl.push((dialect, export_schema_to_sql(schema, dialect)?));
        }

        fs::create_dir_all(&self.directory).map_err(|e| {
            Error::ExportError(format!(
                "Failed to create output directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let base = format_file_name(&schema.name);
        let bundle = DocumentBundle {
            schema_json: self.write_file(&format!("{}_schema.json", base), &schema_json)?,
            er_diagram: self.write_file(&format!("{}_er_diagram.dot", base), &diagram)?,
            sql: ddl
                .iter()
                .map(|(dialect, sql)| {
                    let path = self.write_file(&format!("{}_{}.sql", base, dialect.as_str()), sql)?;
                    Ok((*dialect, path))
                })
                .collect::<Result<Vec<_>>>()?,
            normalization_analysis: self
                .write_file(&format!("{}_normalization_analysis.json", base), &analysis)?,
        };

        tracing::info!(
            schema = %schema.name,
            directory = %self.directory.display(),
            files = bundle.files().len(),
            "Wrote documentation bundle"
        );

        Ok(bundle)
    }

    fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.directory.join(file_name);
        let mut file = File::create(&path).map_err(|e| {
            Error::ExportError(format!("Failed to create {}: {}", path.display(), e))
        })?;
        file.write_all(contents.as_bytes()).map_err(|e| {
            Error::ExportError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Wrote file");
        Ok(path)
    }
}
