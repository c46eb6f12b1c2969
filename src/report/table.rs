//! Fixed-width text tables.

use std::fmt;

use crate::processing::{grand_totals, Period, PeriodSummary, PeriodTotals};
use crate::types::{DaySummary, PhaseValues};

use super::locale::{format_date, format_quantity, month_name, WeekdayNames};

const MIN_VALUE_WIDTH: usize = 8;
const DATE_WIDTH: usize = 14;
const GROUP_GAP: &str = "      ";

/// Renders period summaries as text.
///
/// Rendering is exposed through [`fmt::Display`] wrappers, so `to_string()` produces the
/// report and `write!` streams it.
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    weekdays: WeekdayNames,
}

impl ReportFormatter {
    pub fn new(weekdays: WeekdayNames) -> Self {
        Self { weekdays }
    }

    /// One section per period followed, when there is more than one period, by a labeled
    /// grand totals section.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use energy_report::processing::group_by_week;
    /// use energy_report::report::ReportFormatter;
    /// use energy_report::types::{DaySummary, PhaseValues};
    ///
    /// let day = DaySummary {
    ///     date: NaiveDate::from_ymd_opt(2025, 10, 13).unwrap(),
    ///     consumption: PhaseValues::new(24.0, 1.5, 0.0),
    ///     production: PhaseValues::ZERO,
    /// };
    /// let text = ReportFormatter::default().weekly(&group_by_week(&[day])).to_string();
    /// assert!(text.starts_with("Week 42 "));
    /// assert!(text.contains("maanantai   13.10.2025"));
    /// assert!(text.contains("   24,00     1,50"));
    /// ```
    pub fn weekly<'a>(&'a self, sections: &'a [PeriodSummary]) -> WeeklyReport<'a> {
        WeeklyReport {
            formatter: self,
            sections,
        }
    }

    /// Title, totals and day table of a single period.
    pub fn period<'a>(&'a self, summary: &'a PeriodSummary) -> PeriodReport<'a> {
        PeriodReport {
            formatter: self,
            summary,
        }
    }

    fn columns<'d>(&self, days: impl IntoIterator<Item = &'d DaySummary>) -> Columns {
        let value = days
            .into_iter()
            .flat_map(|d| d.consumption.iter().chain(d.production.iter()))
            .map(|v| format_quantity(v).len())
            .fold(MIN_VALUE_WIDTH, usize::max);

        Columns {
            day: self.weekdays.max_width().max("Day".len()) + 1,
            date: DATE_WIDTH,
            value,
        }
    }

    fn day_table(&self, f: &mut fmt::Formatter<'_>, days: &[DaySummary], cols: Columns) -> fmt::Result {
        let Columns { day, date, value } = cols;
        let group = 3 * value + 2;

        writeln!(
            f,
            "{:<day$}{:<date$}{:<width$}{}",
            "Day",
            "Date",
            "Consumption [kWh]",
            "Production [kWh]",
            width = group + GROUP_GAP.len(),
        )?;
        write!(f, "{:<day$}{:<date$}", "", "")?;
        write_phase_row(f, ["v1", "v2", "v3"], value)?;
        f.write_str(GROUP_GAP)?;
        write_phase_row(f, ["v1", "v2", "v3"], value)?;
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(day + date + 2 * group + GROUP_GAP.len()))?;

        for d in days {
            write!(f, "{:<day$}{:<date$}", self.weekdays.name_of(d.date), format_date(d.date))?;
            write_phase_row(f, quantities(d.consumption), value)?;
            f.write_str(GROUP_GAP)?;
            write_phase_row(f, quantities(d.production), value)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    day: usize,
    date: usize,
    value: usize,
}

fn quantities(values: PhaseValues) -> [String; 3] {
    values.0.map(format_quantity)
}

fn write_phase_row<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, cells: [S; 3], width: usize) -> fmt::Result {
    let [a, b, c] = cells;
    write!(f, "{:>width$} {:>width$} {:>width$}", a.as_ref(), b.as_ref(), c.as_ref())
}

fn write_totals(f: &mut fmt::Formatter<'_>, totals: &PeriodTotals) -> fmt::Result {
    for (label, values) in [("Consumption", totals.consumption), ("Production ", totals.production)] {
        let [v1, v2, v3] = quantities(values);
        writeln!(
            f,
            "{label} [kWh] by phase: v1={v1}  v2={v2}  v3={v3}  total={}",
            format_quantity(values.total())
        )?;
    }
    Ok(())
}

fn write_heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(title.chars().count()))
}

fn period_title(period: &Period) -> String {
    match *period {
        Period::Week { week, .. } => format!("Week {week} electricity consumption and production (kWh, by phase)"),
        Period::Range { start, end } => {
            format!("Report for the period {}-{}", format_date(start), format_date(end))
        }
        Period::Month { year, month } => match month_name(month) {
            Some(name) => format!("Report for the month: {name} {year}"),
            None => format!("Report for the month: {year}-{month:02}"),
        },
        Period::Year { year } => format!("Report for the year: {year}"),
    }
}

fn totals_title(sections: &[PeriodSummary]) -> String {
    let weeks: Vec<(i32, u32)> = sections
        .iter()
        .filter_map(|s| match s.period {
            Period::Week { year, week } => Some((year, week)),
            _ => None,
        })
        .collect();

    match (weeks.first(), weeks.last()) {
        (Some((y1, w1)), Some((y2, w2))) if weeks.len() == sections.len() => {
            if y1 == y2 {
                format!("Overall totals for weeks {w1}-{w2} (kWh)")
            } else {
                format!("Overall totals for weeks {w1}/{y1}-{w2}/{y2} (kWh)")
            }
        }
        _ => "Overall totals (kWh)".to_string(),
    }
}

/// Multi-section report; see [`ReportFormatter::weekly`].
#[derive(Debug, Clone, Copy)]
pub struct WeeklyReport<'a> {
    formatter: &'a ReportFormatter,
    sections: &'a [PeriodSummary],
}

impl fmt::Display for WeeklyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self
            .formatter
            .columns(self.sections.iter().flat_map(|s| &s.days));

        for section in self.sections {
            writeln!(f, "{}", period_title(&section.period))?;
            self.formatter.day_table(f, &section.days, cols)?;
            writeln!(f)?;
        }

        if self.sections.len() > 1 {
            write_heading(f, &totals_title(self.sections))?;
            write_totals(f, &grand_totals(self.sections))?;
        }
        Ok(())
    }
}

/// Single-period report; see [`ReportFormatter::period`].
#[derive(Debug, Clone, Copy)]
pub struct PeriodReport<'a> {
    formatter: &'a ReportFormatter,
    summary: &'a PeriodSummary,
}

impl fmt::Display for PeriodReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        write_heading(f, &period_title(&summary.period))?;
        write_totals(f, &summary.totals)?;
        writeln!(f)?;

        if summary.days.is_empty() {
            return writeln!(f, "No data for this period.");
        }
        self.formatter
            .day_table(f, &summary.days, self.formatter.columns(&summary.days))
    }
}
