//! Machine-readable export of period summaries.
//!
//! Dates serialize as ISO `yyyy-mm-dd` and quantities as plain kWh numbers; locale
//! formatting only applies to the text report.

use serde::Serialize;

use crate::processing::{grand_totals, PeriodSummary, PeriodTotals};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    periods: &'a [PeriodSummary],
    /// Present when more than one period is reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<PeriodTotals>,
}

/// Pretty-printed JSON for the given periods, with grand totals when there are several.
pub fn to_json(periods: &[PeriodSummary]) -> serde_json::Result<String> {
    let report = JsonReport {
        periods,
        totals: (periods.len() > 1).then(|| grand_totals(periods)),
    };
    serde_json::to_string_pretty(&report)
}
