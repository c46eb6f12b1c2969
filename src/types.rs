//! Core data model types.
//!
//! Ingestion produces [`HourlyRecord`]s (raw watt-hours), aggregation turns them into
//! [`DaySummary`]s (kilowatt-hours). [`ColumnMapping`] and [`Dialect`] describe how a
//! particular input file is laid out.

use std::fmt;
use std::ops::{Add, AddAssign, Index};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Number of electrical phases metered per record.
pub const PHASES: usize = 3;

/// One value per electrical phase, ordered phase 1, 2, 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PhaseValues(pub [f64; PHASES]);

impl PhaseValues {
    /// All phases zero.
    pub const ZERO: Self = Self([0.0; PHASES]);

    pub fn new(p1: f64, p2: f64, p3: f64) -> Self {
        Self([p1, p2, p3])
    }

    /// Value for a 1-based phase number.
    ///
    /// # Panics
    ///
    /// Panics if `phase` is not 1, 2 or 3.
    pub fn phase(&self, phase: usize) -> f64 {
        assert!((1..=PHASES).contains(&phase), "phase must be 1..=3, got {phase}");
        self.0[phase - 1]
    }

    /// Sum over all three phases.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Apply `f` to each phase value.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for PhaseValues {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl Add for PhaseValues {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for PhaseValues {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

/// One hourly measurement row. Values are in Wh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord {
    /// Local wall-clock time of the measurement.
    pub timestamp: NaiveDateTime,
    pub consumption: PhaseValues,
    pub production: PhaseValues,
}

impl HourlyRecord {
    pub fn new(timestamp: NaiveDateTime, consumption: PhaseValues, production: PhaseValues) -> Self {
        Self {
            timestamp,
            consumption,
            production,
        }
    }

    /// Calendar date the record is attributed to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Aggregated totals for one calendar day. Values are in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub consumption: PhaseValues,
    pub production: PhaseValues,
}

/// A resolved input column: its position in the row and the label it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub label: String,
}

impl ColumnRef {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.label, self.index)
    }
}

/// Correspondence between logical fields and a file's columns.
///
/// Derived once per file and used only while reading that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub timestamp: ColumnRef,
    /// Consumption columns for phases 1, 2, 3.
    pub consumption: [ColumnRef; PHASES],
    /// Production columns for phases 1, 2, 3.
    pub production: [ColumnRef; PHASES],
}

impl ColumnMapping {
    /// Fixed layout for header-less files: timestamp, consumption 1-3, production 1-3.
    pub fn positional() -> Self {
        let col = |index: usize| ColumnRef::new(index, format!("column {}", index + 1));
        Self {
            timestamp: col(0),
            consumption: [col(1), col(2), col(3)],
            production: [col(4), col(5), col(6)],
        }
    }

    /// Minimum number of fields a row needs to satisfy this mapping.
    pub fn min_fields(&self) -> usize {
        std::iter::once(&self.timestamp)
            .chain(&self.consumption)
            .chain(&self.production)
            .map(|c| c.index + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Delimiter and header-presence convention of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub has_header: bool,
}

impl Dialect {
    /// Delimiter used when sniffing is inconclusive.
    pub const DEFAULT_DELIMITER: u8 = b';';
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER,
            has_header: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_mapping_needs_seven_fields() {
        let m = ColumnMapping::positional();
        assert_eq!(m.min_fields(), 7);
        assert_eq!(m.production[2].index, 6);
        assert_eq!(m.timestamp.label, "column 1");
    }

    #[test]
    fn phase_values_add_and_total() {
        let mut a = PhaseValues::new(1.0, 2.0, 3.0);
        a += PhaseValues::new(0.5, 0.5, 0.5);
        assert_eq!(a, PhaseValues::new(1.5, 2.5, 3.5));
        assert_eq!(a.total(), 7.5);
        assert_eq!(a.phase(2), 2.5);
        assert_eq!((a + PhaseValues::ZERO)[0], 1.5);
    }
}
