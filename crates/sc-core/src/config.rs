//! Configuration types and parsing for samconv.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the input directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "samconv.yml";

/// Converter configuration from samconv.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dialect the input views are written in
    #[serde(default = "default_read_dialect")]
    pub read_dialect: String,

    /// Dialect the models are emitted in
    #[serde(default = "default_write_dialect")]
    pub write_dialect: String,

    /// Where converted models are placed inside the output directory
    #[serde(default)]
    pub layout: OutputLayout,

    /// What to do when two input files produce the same model name
    #[serde(default)]
    pub duplicate_models: DuplicatePolicy,

    /// Name of the sources document inside the output directory
    #[serde(default = "default_sources_file")]
    pub sources_file: String,

    /// Name of the model refs document inside the output directory
    #[serde(default = "default_model_refs_file")]
    pub model_refs_file: String,
}

/// Output layout for converted models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// `<out>/<model>.sql`
    #[default]
    Flat,
    /// `<out>/<model>/<model>.sql`
    Directory,
}

impl OutputLayout {
    /// Path of the converted model inside `output_dir`
    pub fn model_path(self, output_dir: &Path, model: &str) -> PathBuf {
        let file_name = format!("{model}.sql");
        match self {
            OutputLayout::Flat => output_dir.join(file_name),
            OutputLayout::Directory => output_dir.join(model).join(file_name),
        }
    }
}

/// Policy for model names that collide case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Log a warning; the last file wins
    #[default]
    Warn,
    /// Abort the batch
    Error,
}

fn default_read_dialect() -> String {
    "tsql".to_string()
}

fn default_write_dialect() -> String {
    "snowflake".to_string()
}

fn default_sources_file() -> String {
    "sources.yml".to_string()
}

fn default_model_refs_file() -> String {
    "model_refs.yml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_dialect: default_read_dialect(),
            write_dialect: default_write_dialect(),
            layout: OutputLayout::default(),
            duplicate_models: DuplicatePolicy::default(),
            sources_file: default_sources_file(),
            model_refs_file: default_model_refs_file(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Otherwise `samconv.yml` in the input
    /// directory is used when present, and the defaults when not.
    pub fn resolve(explicit: Option<&Path>, input_dir: &Path) -> CoreResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        Self::load_or_default(input_dir)
    }

    /// Load `samconv.yml` from `dir`, falling back to the defaults
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("Using config {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if !self.read_dialect.eq_ignore_ascii_case("tsql") {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "Unsupported read_dialect '{}' (expected 'tsql')",
                    self.read_dialect
                ),
            });
        }
        if !self.write_dialect.eq_ignore_ascii_case("snowflake") {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "Unsupported write_dialect '{}' (expected 'snowflake')",
                    self.write_dialect
                ),
            });
        }
        validate_yaml_file_name("sources_file", &self.sources_file)?;
        validate_yaml_file_name("model_refs_file", &self.model_refs_file)?;
        Ok(())
    }

    /// Absolute path of the sources document
    pub fn sources_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.sources_file)
    }

    /// Absolute path of the model refs document
    pub fn model_refs_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.model_refs_file)
    }
}

fn validate_yaml_file_name(key: &str, value: &str) -> CoreResult<()> {
    let has_yaml_ext = value.ends_with(".yml") || value.ends_with(".yaml");
    let is_plain_name = !value.contains('/') && !value.contains('\\');
    if value.is_empty() || !has_yaml_ext || !is_plain_name {
        return Err(CoreError::ConfigInvalid {
            message: format!("{key} must be a .yml or .yaml file name, got '{value}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
