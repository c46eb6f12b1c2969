//! Hourly to daily aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{DaySummary, HourlyRecord, PhaseValues};

/// Watt-hours per kilowatt-hour.
pub const WH_PER_KWH: f64 = 1000.0;

/// Group hourly records by calendar date and sum each phase.
///
/// - Exactly one [`DaySummary`] per distinct date, in ascending date order.
/// - A record belongs to the date of its timestamp; the time of day is ignored.
/// - Sums are converted from Wh to kWh.
/// - The result does not depend on input order: records within a day are summed in a
///   canonical order, so floating-point rounding is the same for any permutation.
///
/// ```
/// use chrono::NaiveDate;
/// use energy_report::processing::aggregate_daily;
/// use energy_report::types::{HourlyRecord, PhaseValues};
///
/// let day = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
/// let records: Vec<HourlyRecord> = (0..24)
///     .map(|h| {
///         HourlyRecord::new(
///             day.and_hms_opt(h, 0, 0).unwrap(),
///             PhaseValues::new(1000.0, 0.0, 0.0),
///             PhaseValues::ZERO,
///         )
///     })
///     .collect();
///
/// let days = aggregate_daily(&records);
/// assert_eq!(days.len(), 1);
/// assert_eq!(days[0].consumption.phase(1), 24.0);
/// ```
pub fn aggregate_daily(records: &[HourlyRecord]) -> Vec<DaySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&HourlyRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date()).or_default().push(record);
    }

    by_date
        .into_iter()
        .map(|(date, mut day)| {
            day.sort_by(|a, b| canonical_order(a, b));

            let mut consumption = PhaseValues::ZERO;
            let mut production = PhaseValues::ZERO;
            for r in day {
                consumption += r.consumption;
                production += r.production;
            }

            DaySummary {
                date,
                consumption: consumption.map(|wh| wh / WH_PER_KWH),
                production: production.map(|wh| wh / WH_PER_KWH),
            }
        })
        .collect()
}

fn canonical_order(a: &HourlyRecord, b: &HourlyRecord) -> std::cmp::Ordering {
    a.timestamp.cmp(&b.timestamp).then_with(|| {
        a.consumption
            .iter()
            .chain(a.production.iter())
            .zip(b.consumption.iter().chain(b.production.iter()))
            .map(|(x, y)| x.total_cmp(&y))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
