//! Error types for schema_design

use thiserror::Error;

/// Result type for schema_design operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema_design
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source catalog could not be read. Partial results are never returned.
    #[error("Extraction error: {message}")]
    ExtractionError {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// The schema is internally inconsistent (dangling keys, duplicate names).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Unsupported dialect or unwritable output location.
    #[error("Export error: {0}")]
    ExportError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Extraction failure without an underlying driver error
    pub fn extraction(message: impl Into<String>) -> Self {
        Error::ExtractionError {
            message: message.into(),
            source: None,
        }
    }

    /// Extraction failure caused by a driver error
    pub fn extraction_with(message: impl Into<String>, source: sqlx::Error) -> Self {
        Error::ExtractionError {
            message: format!("{}: {}", message.into(), source),
            source: Some(source),
        }
    }
}

/// Driver errors only surface while reading a catalog
impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        Error::ExtractionError {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

/// Convert Serde JSON errors to schema_design errors
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

/// Convert TOML deserialization errors to schema_design errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
