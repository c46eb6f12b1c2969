//! Finnish number and date conventions.
//!
//! Nothing outside the report module formats numbers or dates for humans.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::error::ConfigError;

/// Weekday names, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct WeekdayNames([String; 7]);

impl WeekdayNames {
    /// Finnish, lower-case.
    pub fn finnish() -> Self {
        Self::from_strs([
            "maanantai",
            "tiistai",
            "keskiviikko",
            "torstai",
            "perjantai",
            "lauantai",
            "sunnuntai",
        ])
    }

    pub fn english() -> Self {
        Self::from_strs(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"])
    }

    fn from_strs(names: [&str; 7]) -> Self {
        Self(names.map(str::to_owned))
    }

    /// Name of the weekday `date` falls on.
    pub fn name_of(&self, date: NaiveDate) -> &str {
        &self.0[date.weekday().num_days_from_monday() as usize]
    }

    /// Length in characters of the longest name.
    pub fn max_width(&self) -> usize {
        self.0.iter().map(|n| n.chars().count()).max().unwrap_or(0)
    }
}

impl Default for WeekdayNames {
    fn default() -> Self {
        Self::finnish()
    }
}

impl TryFrom<Vec<String>> for WeekdayNames {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let found = names.len();
        names
            .try_into()
            .map(Self)
            .map_err(|_| ConfigError::Invalid(format!("weekday_names needs 7 entries, got {found}")))
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Two fraction digits with a decimal comma.
///
/// ```
/// use energy_report::report::format_quantity;
///
/// assert_eq!(format_quantity(24.0), "24,00");
/// assert_eq!(format_quantity(1.005), "1,00");
/// ```
pub fn format_quantity(value: f64) -> String {
    // Collapse -0.0 after rounding so it never renders as "-0,00".
    let value = if (value * 100.0).round() == 0.0 { 0.0 } else { value };
    format!("{value:.2}").replace('.', ",")
}

/// `dd.mm.yyyy`, zero padded.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
