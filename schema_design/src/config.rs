//! Configuration handling for schema_design

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Represents the complete schema_design configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// One of `sqlite`, `mysql`, `postgres`
    pub driver: String,
    pub url: String,
    /// Overrides the schema name derived from the URL
    pub name: Option<String>,
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl DatabaseConfig {
    /// Catalog timeout, defaulting to 30 seconds
    pub fn timeout(&self) -> std::time::Duration {
        self.timeout_seconds
            .map(std::time::Duration::from_secs)
            .unwrap_or(crate::db::connection::DEFAULT_TIMEOUT)
    }

    /// Name given to schemas extracted from this database.
    ///
    /// SQLite files are named after their file stem with a `.db` suffix removed,
    /// server databases after the last path segment of the URL.
    pub fn schema_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        let without_query = self.url.split('?').next().unwrap_or(&self.url);
        let path = without_query
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(without_query)
            .trim_start_matches("sqlite:");

        let last = if self.driver == "sqlite" {
            Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(path)
                .to_string()
        } else {
            path.rsplit('/').next().unwrap_or(path).to_string()
        };

        let name = last.replace(".db", "");
        if name.is_empty() {
            "database".to_string()
        } else {
            name
        }
    }
}

/// Output generation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    /// Also document the normalized derivative of the schema
    #[serde(default)]
    pub include_normalized: bool,
}

fn default_output_directory() -> String {
    "./schema_docs".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            include_normalized: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
}
