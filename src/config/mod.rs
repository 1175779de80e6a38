//! Dump configuration (rootcert.toml)
//!
//! Three layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Config file (`rootcert.toml` in the working directory, or `--config`)
//! 3. CLI flags

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::image::DEFAULT_MAX_IMAGE_BYTES;
use rootcert_format::STORE_HEADER_SIZE;

/// Config file looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "rootcert.toml";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Output format for decoded stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Serial-console style hex dump
    #[default]
    Human,
    /// JSON report
    Json,
}

/// Settings for `rootcert-dump`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Output format (default: human)
    #[serde(default)]
    pub format: OutputFormat,

    /// Refuse images larger than this (default: 1 MiB)
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,

    /// Print modulus, exponent and curve point bytes (default: true)
    #[serde(default = "default_show_key_material")]
    pub show_key_material: bool,

    /// Stop after this many entries (default: all)
    #[serde(default)]
    pub limit: Option<u32>,
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

fn default_show_key_material() -> bool {
    true
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            max_image_bytes: default_max_image_bytes(),
            show_key_material: default_show_key_material(),
            limit: None,
        }
    }
}

/// Values given on the command line; unset flags leave the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub json: bool,
    pub limit: Option<u32>,
    pub hide_key_material: bool,
}

impl DumpConfig {
    /// Load config from a specific path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: DumpConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or the default file if it exists, or
    /// fall back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("using {}", default_path.display());
                    Self::load(default_path)
                } else {
                    log::debug!("no {}, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply CLI flags on top of this config
    pub fn with_overrides(mut self, cli: &CliOverrides) -> Result<Self, ConfigError> {
        if cli.json {
            self.format = OutputFormat::Json;
        }
        if cli.limit.is_some() {
            self.limit = cli.limit;
        }
        if cli.hide_key_material {
            self.show_key_material = false;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_image_bytes < STORE_HEADER_SIZE as u64 {
            return Err(ConfigError::Validation(format!(
                "max_image_bytes must be at least {} (the store header size)",
                STORE_HEADER_SIZE
            )));
        }
        if self.limit == Some(0) {
            return Err(ConfigError::Validation("limit must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = DumpConfig::parse("").unwrap();
        assert_eq!(config, DumpConfig::default());
        assert_eq!(config.format, OutputFormat::Human);
        assert!(config.show_key_material);
        assert_eq!(config.max_image_bytes, 1024 * 1024);
    }

    #[test]
    fn test_parse_full() {
        let toml = r#"
format = "json"
max_image_bytes = 8192
show_key_material = false
limit = 3
"#;
        let config = DumpConfig::parse(toml).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.max_image_bytes, 8192);
        assert!(!config.show_key_material);
        assert_eq!(config.limit, Some(3));
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let result = DumpConfig::parse(r#"format = "xml""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_limit_zero() {
        let result = DumpConfig::parse("limit = 0");
        assert!(result.unwrap_err().to_string().contains("limit"));
    }

    #[test]
    fn test_validation_max_image_bytes() {
        let result = DumpConfig::parse("max_image_bytes = 10");
        assert!(result.unwrap_err().to_string().contains("max_image_bytes"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = DumpConfig::parse("limit = 5").unwrap();
        let cli = CliOverrides {
            json: true,
            limit: Some(2),
            hide_key_material: true,
        };
        let config = config.with_overrides(&cli).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.limit, Some(2));
        assert!(!config.show_key_material);
    }

    #[test]
    fn test_cli_overrides_absent_keep_file_values() {
        let config = DumpConfig::parse("format = \"json\"\nlimit = 5").unwrap();
        let config = config.with_overrides(&CliOverrides::default()).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.limit, Some(5));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "show_key_material = false").unwrap();

        let config = DumpConfig::load_or_default(Some(file.path())).unwrap();
        assert!(!config.show_key_material);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = DumpConfig::load(Path::new("/nonexistent/rootcert.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
