//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which reads one hourly meter file into an
//! [`HourlyFile`] using the given [`ReadOptions`].
//!
//! - Reading is all-or-nothing per file: the first bad row rejects the file.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};

use super::csv::{read_hourly_from_path, HourlyFile, ReadOptions};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Per-file read options (delimiter, layout, numeric policy).
    pub read: ReadOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("read", &self.read)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            read: ReadOptions::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/delimiter/substitution stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use energy_report::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), energy_report::IngestionError> {
/// let file = ingest_from_path("week42.csv", &IngestionOptions::default())?;
/// println!("rows={}", file.records.len());
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (log file + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use energy_report::ingestion::{ingest_from_path, FileObserver, IngestionOptions, IngestionSeverity};
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(FileObserver::new("ingest.log"))),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = ingest_from_path("does_not_exist.csv", &opts).unwrap_err();
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<HourlyFile> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        layout: options.read.layout,
    };

    let result = read_hourly_from_path(path, &options.read);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(file) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: file.records.len(),
                    delimiter: file.dialect.delimiter,
                    header: file.header.is_some(),
                    substituted_fields: file.substituted_fields,
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Ingest several files in order, stopping at the first failure.
///
/// Files are returned in the order given. Since any failing file aborts the run, callers
/// never see a report built from a subset of the inputs.
pub fn ingest_many<P: AsRef<Path>>(paths: &[P], options: &IngestionOptions) -> IngestionResult<Vec<HourlyFile>> {
    paths.iter().map(|p| ingest_from_path(p, options)).collect()
}

/// Map an ingestion error to the severity reported to observers.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::FileAccess { .. } => IngestionSeverity::Critical,
        IngestionError::Csv { source, .. } => match source.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Schema { .. } => IngestionSeverity::Error,
        IngestionError::Row { .. } => IngestionSeverity::Error,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::error::{RowError, TimestampFormatError};

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl IngestionObserver for Recording {
        fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
            self.events.lock().unwrap().push(format!("ok:{}", stats.rows));
        }

        fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
            self.events.lock().unwrap().push(format!("fail:{severity:?}"));
        }

        fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
            self.events.lock().unwrap().push(format!("alert:{severity:?}"));
        }
    }

    #[test]
    fn missing_file_is_critical_and_alerts() {
        let obs = Arc::new(Recording::default());
        let opts = IngestionOptions {
            observer: Some(obs.clone()),
            ..Default::default()
        };

        let err = ingest_from_path("no/such/week.csv", &opts).unwrap_err();
        assert!(matches!(err, IngestionError::FileAccess { .. }));
        assert_eq!(*obs.events.lock().unwrap(), vec!["fail:Critical", "alert:Critical"]);
    }

    #[test]
    fn row_errors_are_error_severity() {
        let err = IngestionError::Row {
            path: PathBuf::from("w.csv"),
            line: 3,
            raw: "x".to_string(),
            source: RowError::Timestamp(TimestampFormatError { raw: "x".to_string() }),
        };
        assert_eq!(severity_for_error(&err), IngestionSeverity::Error);
    }

    #[test]
    fn ingest_many_stops_at_first_failure() {
        let paths = ["no/such/a.csv", "no/such/b.csv"];
        let err = ingest_many(&paths, &IngestionOptions::default()).unwrap_err();
        assert_eq!(err.path(), Path::new("no/such/a.csv"));
    }
}
