//! Human-readable and JSON rendering of period summaries.
//!
//! - [`table`]: fixed-width text report (weekly sections, single-period reports)
//! - [`json`]: JSON export
//! - [`locale`]: Finnish `dd.mm.yyyy` dates, decimal comma, weekday names

pub mod json;
pub mod locale;
pub mod table;

use serde::Deserialize;

pub use json::to_json;
pub use locale::{format_date, format_quantity, month_name, WeekdayNames};
pub use table::{PeriodReport, ReportFormatter, WeeklyReport};

/// Output format of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
