//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.demographic.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".demographic.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Dataset source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the census file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Whether the first row holds column names.
    #[serde(default)]
    pub has_headers: bool,

    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            has_headers: false,
            delimiter: default_delimiter(),
        }
    }
}

impl DatasetConfig {
    /// Delimiter as a byte.
    ///
    /// Only meaningful once [`Config::validate`] has accepted the delimiter;
    /// a non-ASCII character maps to a comma.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("adult.data.csv")
}

fn default_delimiter() -> char {
    ','
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Print the report after computing it.
    #[serde(default = "default_true")]
    pub print_data: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            print_data: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Check settings that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if !self.dataset.delimiter.is_ascii() {
            bail!(
                "Delimiter must be an ASCII character: {:?}",
                self.dataset.delimiter
            );
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.clone();
        }
        if let Some(delimiter) = args.delimiter {
            self.dataset.delimiter = delimiter;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags always override
        if args.has_headers {
            self.dataset.has_headers = true;
        }
        if args.no_print {
            self.report.print_data = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset.path, PathBuf::from("adult.data.csv"));
        assert!(!config.dataset.has_headers);
        assert_eq!(config.dataset.delimiter_byte(), b',');
        assert_eq!(config.report.format, OutputFormat::Text);
        assert!(config.report.print_data);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[dataset]
path = "data/census.csv"
has_headers = true
delimiter = ";"

[report]
format = "markdown"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("data/census.csv"));
        assert!(config.dataset.has_headers);
        assert_eq!(config.dataset.delimiter_byte(), b';');
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert!(config.report.print_data);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[report]\nprint_data = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.report.print_data);
        assert_eq!(config.dataset.path, PathBuf::from("adult.data.csv"));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[report\nformat = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_non_ascii_delimiter() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[dataset]\ndelimiter = \"§\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("ASCII"));
    }

    #[test]
    fn test_validate_after_merge() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.dataset.delimiter = '|';
        assert!(config.validate().is_ok());

        config.dataset.delimiter = 'é';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.report.format = OutputFormat::Markdown;

        let args = Args::try_parse_from([
            "demographic-analyzer",
            "--data",
            "other.csv",
            "--no-print",
            "--has-headers",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.dataset.path, PathBuf::from("other.csv"));
        assert!(config.dataset.has_headers);
        assert!(!config.report.print_data);
        // Not given on the command line, so the file value stays
        assert_eq!(config.report.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[dataset]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("format = \"text\""));
    }
}
