//! Grouping day summaries into report periods (ISO weeks, date ranges, months, years).

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::types::{DaySummary, HourlyRecord, PhaseValues};

use super::daily::aggregate_daily;

/// Per-phase totals over a set of days, in kWh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub consumption: PhaseValues,
    pub production: PhaseValues,
}

impl PeriodTotals {
    /// Sum the given days in order.
    pub fn from_days<'a>(days: impl IntoIterator<Item = &'a DaySummary>) -> Self {
        days.into_iter().fold(Self::default(), |mut acc, d| {
            acc.consumption += d.consumption;
            acc.production += d.production;
            acc
        })
    }
}

/// The span of calendar time a [`PeriodSummary`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    /// ISO-8601 week.
    Week { year: i32, week: u32 },
    /// Inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    /// Inclusive range; bounds are swapped when given in reverse.
    pub fn range(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        Self::Range { start, end }
    }

    /// ISO week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self::Week {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Whether `date` falls in this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Week { year, week } => {
                let iso = date.iso_week();
                iso.year() == year && iso.week() == week
            }
            Self::Range { start, end } => (start..=end).contains(&date),
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year { year } => date.year() == year,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week { year, week } => write!(f, "week {week}/{year}"),
            Self::Range { start, end } => write!(f, "{start}..={end}"),
            Self::Month { year, month } => write!(f, "{year}-{month:02}"),
            Self::Year { year } => write!(f, "{year}"),
        }
    }
}

/// The days of one period with their totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    /// Days in ascending date order. May be empty when no data falls in the period.
    pub days: Vec<DaySummary>,
    pub totals: PeriodTotals,
}

impl PeriodSummary {
    /// Keep the days that fall in `period` and total them.
    pub fn select(period: Period, days: &[DaySummary]) -> Self {
        let days: Vec<DaySummary> = days.iter().filter(|d| period.contains(d.date)).copied().collect();
        let totals = PeriodTotals::from_days(&days);
        Self { period, days, totals }
    }
}

/// Summarize one file's records as a week section.
///
/// The week is the ISO week of the first record in input order; every day of the file is
/// kept even when the file spills into the next week. Returns `None` for no records.
pub fn summarize_week(records: &[HourlyRecord]) -> Option<PeriodSummary> {
    let first = records.first()?;
    let days = aggregate_daily(records);
    let totals = PeriodTotals::from_days(&days);
    Some(PeriodSummary {
        period: Period::week_of(first.date()),
        days,
        totals,
    })
}

/// Split ascending day summaries into one section per ISO week.
pub fn group_by_week(days: &[DaySummary]) -> Vec<PeriodSummary> {
    days.chunk_by(|a, b| a.date.iso_week() == b.date.iso_week())
        .map(|chunk| PeriodSummary {
            period: Period::week_of(chunk[0].date),
            days: chunk.to_vec(),
            totals: PeriodTotals::from_days(chunk),
        })
        .collect()
}

/// Days between `from` and `to` inclusive (either order).
pub fn summarize_range(days: &[DaySummary], from: NaiveDate, to: NaiveDate) -> PeriodSummary {
    PeriodSummary::select(Period::range(from, to), days)
}

/// Days of one calendar month. Returns `None` when `month` is not 1..=12.
pub fn summarize_month(days: &[DaySummary], year: i32, month: u32) -> Option<PeriodSummary> {
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(PeriodSummary::select(Period::Month { year, month }, days))
}

/// Days of one calendar year.
pub fn summarize_year(days: &[DaySummary], year: i32) -> PeriodSummary {
    PeriodSummary::select(Period::Year { year }, days)
}

/// Totals across several periods, summed period by period.
pub fn grand_totals(periods: &[PeriodSummary]) -> PeriodTotals {
    PeriodTotals::from_days(periods.iter().flat_map(|p| &p.days))
}
