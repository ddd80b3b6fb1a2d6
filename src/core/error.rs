use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation failed: {}", .0.join(" "))]
    ValidationError(Vec<String>),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("Schema upgrade error: {0}")]
    SchemaUpgradeError(String),
}

impl CatalogError {
    /// Validation messages carried by this error, empty for every other kind.
    pub fn messages(&self) -> &[String] {
        match self {
            CatalogError::ValidationError(msgs) => msgs,
            _ => &[],
        }
    }
}
