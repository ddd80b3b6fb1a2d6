//! Catalog configuration loaded from `toolcat.toml`.
//!
//! A missing file means defaults. Relative paths resolve against the
//! directory holding the config file.

use crate::core::error::CatalogError;
use crate::core::schemas::{self, CATEGORY_SENTINEL, Schema, UPLOADER_SENTINEL};
use crate::core::validate::{UploaderMode, ValidationRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "toolcat.toml";

/// Overrides `data_file` when set.
pub const ENV_DATA_FILE: &str = "TOOLCAT_DATA_FILE";

/// Overrides `[logging] level` when set.
pub const ENV_LOG: &str = "TOOLCAT_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploaderModeSetting {
    #[default]
    FreeText,
    Roster,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub mode: UploaderModeSetting,
    pub roster: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub data_file: PathBuf,
    /// Carry the `Tool_Link` column.
    pub tool_link: bool,
    pub categories: Vec<String>,
    pub uploader: UploaderConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(schemas::DEFAULT_DATA_FILE),
            tool_link: true,
            categories: schemas::DEFAULT_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            uploader: UploaderConfig::default(),
            logging: LoggingConfig::default(),
            base_dir: PathBuf::new(),
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, CatalogError> {
        let mut config: CatalogConfig = toml::from_str(content)?;
        config.base_dir = base_dir.to_path_buf();
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::ConfigError(
                "categories must not be empty".to_string(),
            ));
        }
        if self.categories.iter().any(|c| c == CATEGORY_SENTINEL) {
            return Err(CatalogError::ConfigError(format!(
                "'{}' is reserved and cannot be a category",
                CATEGORY_SENTINEL
            )));
        }
        if self.uploader.mode == UploaderModeSetting::Roster {
            if self.uploader.roster.is_empty() {
                return Err(CatalogError::ConfigError(
                    "uploader.mode = \"roster\" requires a non-empty uploader.roster".to_string(),
                ));
            }
            if self.uploader.roster.iter().any(|r| r == UPLOADER_SENTINEL) {
                return Err(CatalogError::ConfigError(format!(
                    "'{}' is reserved and cannot be a roster entry",
                    UPLOADER_SENTINEL
                )));
            }
        }
        Ok(())
    }

    /// Absolute or base-relative path of the catalog file.
    pub fn data_path(&self) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            self.base_dir.join(&self.data_file)
        }
    }

    pub fn schema(&self) -> Schema {
        Schema::with_tool_link(self.tool_link)
    }

    pub fn validation_rules(&self) -> ValidationRules {
        let uploader = match self.uploader.mode {
            UploaderModeSetting::FreeText => UploaderMode::FreeText,
            UploaderModeSetting::Roster => UploaderMode::Roster(self.uploader.roster.clone()),
        };
        ValidationRules {
            categories: self.categories.clone(),
            uploader,
        }
    }

    fn apply_env(&mut self) {
        if let Some(path) = std::env::var_os(ENV_DATA_FILE).filter(|v| !v.is_empty()) {
            self.data_file = PathBuf::from(path);
        }
        if let Ok(level) = std::env::var(ENV_LOG) {
            if !level.trim().is_empty() {
                self.logging.level = level;
            }
        }
    }
}

/// Load `toolcat.toml` from `dir`, or defaults rooted at `dir` when absent.
pub fn load_config(dir: &Path) -> Result<CatalogConfig, CatalogError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let mut config = if path.exists() {
        load_config_file(&path)?
    } else {
        CatalogConfig {
            base_dir: dir.to_path_buf(),
            ..CatalogConfig::default()
        }
    };
    config.apply_env();
    Ok(config)
}

/// Load an explicitly named config file; it must exist.
pub fn load_config_file(path: &Path) -> Result<CatalogConfig, CatalogError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CatalogError::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    CatalogConfig::from_toml_str(&content, base_dir)
}

/// Like [`load_config_file`], with environment overrides applied.
pub fn load_config_file_with_env(path: &Path) -> Result<CatalogConfig, CatalogError> {
    let mut config = load_config_file(path)?;
    config.apply_env();
    Ok(config)
}
