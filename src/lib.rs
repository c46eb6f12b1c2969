//! `energy-report` turns hourly three-phase energy meter exports into per-day kWh summaries and
//! Finnish-style text reports.
//!
//! The primary entrypoint is [`ingestion::ingest_from_path`], which sniffs the delimiter and
//! header of a delimited file, maps its columns and parses every row into a
//! [`types::HourlyRecord`]. [`processing::aggregate_daily`] then sums the records per calendar
//! day and [`report::ReportFormatter`] renders the result.
//!
//! ## What you can ingest
//!
//! - **Delimiters**: `,`, `;` or tab, sniffed from the start of the file (or forced through
//!   [`ingestion::ReadOptions::delimiter`]).
//! - **Headers**: optional. Labels such as `Consumption phase 1 Wh`, `ConsumptionPhase1` or
//!   `Kulutus vaihe 1 [Wh]` are recognized; without a header the columns are timestamp,
//!   consumption 1-3, production 1-3.
//! - **Timestamps**: ISO-8601 (`T` or space, optional seconds/fraction/zone) plus a few common
//!   variants; see [`parse::parse_timestamp`].
//! - **Numbers**: decimal point or decimal comma, empty fields as zero; see
//!   [`parse::parse_quantity`].
//!
//! A bad row aborts the file with the file name and 1-based line number. No partial results
//! are returned.
//!
//! ## Quick example: ingest, aggregate, report
//!
//! ```rust
//! use energy_report::ingestion::{read_hourly_from_str, ReadOptions};
//! use energy_report::processing::{aggregate_daily, group_by_week};
//! use energy_report::report::ReportFormatter;
//!
//! # fn main() -> Result<(), energy_report::IngestionError> {
//! let csv = "Time;Consumption phase 1 Wh;Consumption phase 2 Wh;Consumption phase 3 Wh;\
//!            Production phase 1 Wh;Production phase 2 Wh;Production phase 3 Wh\n\
//!            2025-10-13T00:00:00;1200,5;800;750;0;0;0\n\
//!            2025-10-13T01:00:00;1100;790,25;700;0;0;0\n";
//!
//! let file = read_hourly_from_str("week42.csv", csv, &ReadOptions::default())?;
//! let days = aggregate_daily(&file.records);
//! assert_eq!(days[0].consumption.phase(1), 2.3005);
//!
//! let report = ReportFormatter::default().weekly(&group_by_week(&days)).to_string();
//! assert!(report.contains("maanantai   13.10.2025        2,30     1,59     1,45"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Files on disk
//!
//! ```no_run
//! use energy_report::ingestion::{ingest_many, IngestionOptions};
//! use energy_report::processing::{grand_totals, summarize_week};
//!
//! # fn main() -> Result<(), energy_report::IngestionError> {
//! let files = ingest_many(&["week41.csv", "week42.csv", "week43.csv"], &IngestionOptions::default())?;
//! let weeks: Vec<_> = files.iter().filter_map(|f| summarize_week(&f.records)).collect();
//! println!("consumption: {:?}", grand_totals(&weeks).consumption);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: sniffing, column detection, reading, observers
//! - [`parse`]: timestamp and quantity parsers
//! - [`processing`]: daily aggregation and report periods
//! - [`report`]: text and JSON rendering
//! - [`types`]: records, summaries, column mapping
//! - [`config`]: TOML configuration
//! - [`inputs`]: expansion of file/directory/glob arguments
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod ingestion;
pub mod inputs;
pub mod parse;
pub mod processing;
pub mod report;
pub mod types;

pub use error::{IngestionError, IngestionResult};
