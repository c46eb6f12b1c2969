use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use energy_report::ingestion::{
    ingest_from_path, CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionOptions,
    IngestionSeverity, IngestionStats, ReadOptions,
};
use energy_report::parse::NumericPolicy;
use energy_report::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn opts_with(obs: Arc<RecordingObserver>, alert_at_or_above: IngestionSeverity) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = opts_with(obs.clone(), IngestionSeverity::Critical);

    // Missing file -> FileAccess -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn row_error_does_not_alert_at_critical_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = opts_with(obs.clone(), IngestionSeverity::Critical);

    let _ = ingest_from_path("tests/fixtures/bad_timestamp.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn row_error_alerts_at_error_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = opts_with(obs.clone(), IngestionSeverity::Error);

    let _ = ingest_from_path("tests/fixtures/bad_timestamp.csv", &opts).unwrap_err();

    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);
}

#[test]
fn success_reports_rows_and_substitutions() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        read: ReadOptions {
            numeric_policy: NumericPolicy::Lenient,
            ..Default::default()
        },
        observer: Some(obs.clone()),
        ..Default::default()
    };

    ingest_from_path("tests/fixtures/invalid_number.csv", &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![IngestionStats {
            rows: 3,
            delimiter: b';',
            header: true,
            substituted_fields: 1,
        }]
    );
}

#[test]
fn composite_fans_out_and_file_observer_appends() {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let log = std::env::temp_dir().join(format!("energy_report_observer_{nanos}.log"));

    let recording = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn IngestionObserver>> = vec![recording.clone(), Arc::new(FileObserver::new(&log))];
    let opts = IngestionOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    ingest_from_path("tests/fixtures/compact_headers.csv", &opts).unwrap();
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(recording.successes.lock().unwrap().len(), 1);
    assert_eq!(*recording.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);

    let contents = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "{contents}");
    assert!(lines[0].contains(" ok path=tests/fixtures/compact_headers.csv rows=2"));
    assert!(lines[1].contains(" fail severity=Critical"));
    assert!(lines[2].contains(" ALERT severity=Critical"));

    let _ = fs::remove_file(&log);
}
