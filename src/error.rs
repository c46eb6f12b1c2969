use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// A timestamp token matched none of the recognized patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized timestamp format: '{raw}'")]
pub struct TimestampFormatError {
    /// The offending text, as found in the input.
    pub raw: String,
}

/// A numeric token is not a valid meter quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity '{raw}': {reason}")]
pub struct NumericFormatError {
    /// The offending text, as found in the input.
    pub raw: String,
    /// Why the text was rejected.
    pub reason: String,
}

/// The header row does not name all required columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDetectionError {
    /// A header row was expected but the file has no usable rows.
    #[error("missing header row")]
    MissingHeader,

    /// No header looks like a timestamp column.
    #[error("could not detect timestamp column (expected a header like 'Time' or 'Timestamp'); headers={headers:?}")]
    MissingTimestamp { headers: Vec<String> },

    /// Some of the six phase columns could not be resolved.
    #[error(
        "could not detect all phase columns: missing consumption phases {consumption:?}, \
         missing production phases {production:?} \
         (expected headers like 'Consumption phase 1 Wh' and 'Production phase 1 Wh')"
    )]
    MissingPhases {
        consumption: Vec<u8>,
        production: Vec<u8>,
    },
}

/// Why a single data row could not be turned into an hourly record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error(transparent)]
    Timestamp(#[from] TimestampFormatError),

    #[error("column '{column}': {source}")]
    Numeric {
        column: String,
        #[source]
        source: NumericFormatError,
    },

    /// The row is shorter than the column mapping requires.
    #[error("row has {found} fields, needs {needed}")]
    TooFewFields { found: usize, needed: usize },
}

/// Error type returned by ingestion functions.
///
/// Every variant aborts the read of the current file; there is no row-level recovery.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The input path is missing or unreadable.
    #[error("cannot read '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying CSV tokenizer error.
    #[error("csv error in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row was present but the required columns could not be resolved.
    #[error("schema detection failed for '{}': {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaDetectionError,
    },

    /// A data row failed to parse.
    #[error("error parsing '{}' at line {line}: {source} (raw='{raw}')", .path.display())]
    Row {
        path: PathBuf,
        /// 1-based line number in the input.
        line: u64,
        /// The raw row text, fields re-joined with the detected delimiter.
        raw: String,
        #[source]
        source: RowError,
    },
}

impl IngestionError {
    /// Path (or in-memory label) of the input that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileAccess { path, .. }
            | Self::Csv { path, .. }
            | Self::Schema { path, .. }
            | Self::Row { path, .. } => path,
        }
    }

    /// 1-based line number, for errors tied to a specific row.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Row { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Error loading a [`crate::config::ReportConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Error resolving command-line inputs to files.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot expand glob match: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A pattern or path matched no input file.
    #[error("no input files match '{0}'")]
    NoMatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_message_names_file_and_line() {
        let err = IngestionError::Row {
            path: PathBuf::from("week42.csv"),
            line: 17,
            raw: "yesterday;1;2;3;4;5;6".to_string(),
            source: RowError::Timestamp(TimestampFormatError {
                raw: "yesterday".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("week42.csv"));
        assert!(msg.contains("line 17"));
        assert!(msg.contains("'yesterday'"));
        assert_eq!(err.line(), Some(17));
    }

    #[test]
    fn missing_phases_lists_phase_numbers() {
        let err = SchemaDetectionError::MissingPhases {
            consumption: vec![],
            production: vec![2, 3],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing consumption phases []"));
        assert!(msg.contains("missing production phases [2, 3]"));
    }
}
