//! TOML configuration.
//!
//! Looked up in order: an explicit path, the `ENERGY_REPORT_CONFIG` environment variable,
//! `energy-report.toml` in the working directory. With none of them present the defaults
//! apply. Every key is optional.
//!
//! ```toml
//! [ingestion]
//! delimiter = ";"          # omit to sniff
//! layout = "auto"          # auto | named | positional
//! numeric_policy = "strict" # strict | lenient
//! sniff_bytes = 4096
//! log_file = "ingest.log"
//!
//! [report]
//! format = "text"          # text | json
//! output = "summary.txt"
//! weekday_names = ["ma", "ti", "ke", "to", "pe", "la", "su"]
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ingestion::dialect::DEFAULT_SNIFF_BYTES;
use crate::ingestion::{Layout, ReadOptions};
use crate::parse::NumericPolicy;
use crate::report::{OutputFormat, WeekdayNames};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ENERGY_REPORT_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "energy-report.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestionConfig {
    /// Single-character delimiter; `tab` or `\t` for tab.
    pub delimiter: Option<String>,
    pub layout: Layout,
    pub numeric_policy: NumericPolicy,
    pub sniff_bytes: usize,
    /// Append ingestion events to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            layout: Layout::Auto,
            numeric_policy: NumericPolicy::Strict,
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub weekday_names: WeekdayNames,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub ingestion: IngestionConfig,
    pub report: ReportSection,
}

impl ReportConfig {
    /// Load the configuration following the lookup order above.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&contents, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Parse TOML text. `path` is only used in error messages.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ingestion.sniff_bytes == 0 {
            return Err(ConfigError::Invalid("sniff_bytes must be positive".to_string()));
        }
        self.read_options().map(|_| ())
    }

    /// Reader options described by the `[ingestion]` table.
    pub fn read_options(&self) -> Result<ReadOptions, ConfigError> {
        let delimiter = self
            .ingestion
            .delimiter
            .as_deref()
            .map(parse_delimiter)
            .transpose()
            .map_err(ConfigError::Invalid)?;

        Ok(ReadOptions {
            delimiter,
            layout: self.ingestion.layout,
            numeric_policy: self.ingestion.numeric_policy,
            sniff_bytes: self.ingestion.sniff_bytes,
        })
    }
}

/// Parse a delimiter given as a single ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(text: &str) -> Result<u8, String> {
    match text {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match text.as_bytes() {
            [b] if b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"' && *b != b'\n' => Ok(*b),
            _ => Err(format!("delimiter must be a single punctuation character or 'tab', got {text:?}")),
        },
    }
}
