//! In-memory aggregation of hourly records.
//!
//! The processing layer operates on [`crate::types::HourlyRecord`]s produced by ingestion.
//! It is purely in-memory and has no notion of files or formatting.
//!
//! Currently implemented:
//!
//! - [`aggregate_daily()`]: hourly Wh to per-day kWh, ascending by date
//! - [`group_by_week()`], [`summarize_range()`], [`summarize_month()`], [`summarize_year()`]:
//!   report periods over day summaries
//! - [`grand_totals()`]: totals across several periods
//!
//! ## Example: records → days → weeks
//!
//! ```rust
//! use chrono::NaiveDate;
//! use energy_report::processing::{aggregate_daily, grand_totals, group_by_week};
//! use energy_report::types::{HourlyRecord, PhaseValues};
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
//! let records: Vec<HourlyRecord> = monday
//!     .iter_days()
//!     .take(14)
//!     .map(|d| {
//!         HourlyRecord::new(
//!             d.and_hms_opt(8, 0, 0).unwrap(),
//!             PhaseValues::new(500.0, 250.0, 250.0),
//!             PhaseValues::ZERO,
//!         )
//!     })
//!     .collect();
//!
//! let days = aggregate_daily(&records);
//! let weeks = group_by_week(&days);
//! assert_eq!(weeks.len(), 2);
//! assert_eq!(grand_totals(&weeks).consumption.total(), 14.0);
//! ```

pub mod daily;
pub mod period;

pub use daily::{aggregate_daily, WH_PER_KWH};
pub use period::{
    grand_totals, group_by_week, summarize_month, summarize_range, summarize_week, summarize_year, Period,
    PeriodSummary, PeriodTotals,
};
