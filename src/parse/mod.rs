//! Field-level parsers shared by the tabular reader.
//!
//! - [`parse_timestamp`]: ISO-8601 and a fixed list of fallback layouts to a wall-clock
//!   [`chrono::NaiveDateTime`]
//! - [`parse_quantity`]: decimal-comma or decimal-point text to `f64`, under an explicit
//!   [`NumericPolicy`]
//! - [`parse_fi_date`]: `dd.mm.yyyy` date input

pub mod number;
pub mod timestamp;

pub use number::{parse_quantity, NumericPolicy, Quantity};
pub use timestamp::{parse_fi_date, parse_timestamp};
