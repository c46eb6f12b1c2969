//! Header-driven column detection.
//!
//! The same logical file shows up with different header spellings across collection
//! periods (`Consumption phase 1 Wh`, `ConsumptionPhase1`, `Kulutus vaihe 1 [Wh]`, ...).
//! Headers are normalized before matching so the detector tolerates that drift.

use crate::error::SchemaDetectionError;
use crate::types::{ColumnMapping, ColumnRef, PHASES};

const TIMESTAMP_CONTAINS: &[&str] = &["timestamp", "datetime"];
const TIMESTAMP_EQUALS: &[&str] = &["time", "date"];
const CONSUMPTION_MARKERS: &[&str] = &["consumption", "cons", "kulutus"];
const PRODUCTION_MARKERS: &[&str] = &["production", "prod", "tuotanto"];

/// Normalize a header label for matching.
///
/// Lower-cases, strips white space and the punctuation `- [ ] ( ) _`, then removes the
/// unit suffix `wh`.
///
/// ```
/// use energy_report::ingestion::columns::normalize_header;
///
/// assert_eq!(normalize_header("Consumption phase 1 Wh"), "consumptionphase1");
/// assert_eq!(normalize_header("Production_[kWh] (3)"), "productionk3");
/// ```
pub fn normalize_header(label: &str) -> String {
    label
        .chars()
        .filter(|&c| !c.is_whitespace() && !matches!(c, '-' | '[' | ']' | '(' | ')' | '_' | '\u{feff}'))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .replace("wh", "")
}

/// Resolve the timestamp column and the six phase columns from a header row.
///
/// The first header that looks like a timestamp wins. For each role (consumption,
/// production) the phase number is the first `1`, `2` or `3` in the normalized label, and
/// the first header claiming a phase keeps it.
pub fn detect_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnMapping, SchemaDetectionError> {
    if headers.is_empty() {
        return Err(SchemaDetectionError::MissingHeader);
    }

    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
    let column = |idx: usize| ColumnRef::new(idx, headers[idx].as_ref().trim());

    let timestamp = normalized
        .iter()
        .position(|n| is_timestamp_label(n))
        .map(column)
        .ok_or_else(|| SchemaDetectionError::MissingTimestamp {
            headers: headers.iter().map(|h| h.as_ref().to_owned()).collect(),
        })?;

    let mut consumption: [Option<usize>; PHASES] = [None; PHASES];
    let mut production: [Option<usize>; PHASES] = [None; PHASES];

    for (idx, n) in normalized.iter().enumerate() {
        let Some(phase) = phase_number(n) else {
            continue;
        };
        if contains_any(n, CONSUMPTION_MARKERS) {
            consumption[phase - 1].get_or_insert(idx);
        }
        if contains_any(n, PRODUCTION_MARKERS) {
            production[phase - 1].get_or_insert(idx);
        }
    }

    match (resolve(consumption), resolve(production)) {
        (Ok(c), Ok(p)) => Ok(ColumnMapping {
            timestamp,
            consumption: c.map(column),
            production: p.map(column),
        }),
        (c, p) => Err(SchemaDetectionError::MissingPhases {
            consumption: c.err().unwrap_or_default(),
            production: p.err().unwrap_or_default(),
        }),
    }
}

fn is_timestamp_label(normalized: &str) -> bool {
    contains_any(normalized, TIMESTAMP_CONTAINS) || TIMESTAMP_EQUALS.contains(&normalized)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// First phase digit (1-3) anywhere in the label.
fn phase_number(normalized: &str) -> Option<usize> {
    normalized
        .chars()
        .find(|&c| matches!(c, '1'..='3'))
        .and_then(|c| c.to_digit(10))
        .map(|d| d as usize)
}

/// All three phases resolved, or the list of missing phase numbers.
fn resolve(found: [Option<usize>; PHASES]) -> Result<[usize; PHASES], Vec<u8>> {
    match found {
        [Some(a), Some(b), Some(c)] => Ok([a, b, c]),
        _ => Err((1..=PHASES as u8)
            .zip(found)
            .filter_map(|(phase, idx)| idx.is_none().then_some(phase))
            .collect()),
    }
}
