//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - sniffs the delimiter and header of a delimited hourly meter file
//! - maps columns by header name, or positionally when there is no header
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! The building blocks are also available under:
//! - [`dialect`] (pure delimiter/header sniffing)
//! - [`columns`] (header-driven column detection)
//! - [`csv`] (reading from a path, a reader or a string)

pub mod columns;
pub mod csv;
pub mod dialect;
pub mod observability;
pub mod unified;

pub use self::csv::{
    HourlyFile, Layout, ReadOptions, read_hourly_from_path, read_hourly_from_reader, read_hourly_from_str,
};
pub use columns::{detect_columns, normalize_header};
pub use dialect::sniff_dialect;
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use unified::{ingest_from_path, ingest_many, severity_for_error, IngestionOptions};
