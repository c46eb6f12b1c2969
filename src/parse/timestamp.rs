//! Timestamp parsing.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimestampFormatError;

/// Layouts tried, in order, after the ISO-8601 form fails.
const FALLBACK_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp token into local wall-clock date and time.
///
/// The ISO-8601 combined form (`2025-10-13T00:00:00` or `2025-10-13 00:00:00`, optionally
/// with fractional seconds and a trailing `Z` / `+02:00` zone designator) is tried first. A zone designator is
/// dropped, not applied: the wall-clock value as written is returned. After that the
/// fallback layouts are tried in a fixed order and the first match wins; a bare date
/// parses as midnight.
///
/// ```
/// use energy_report::parse::parse_timestamp;
///
/// let ts = parse_timestamp("2025-10-13T05:00:00+03:00").unwrap();
/// assert_eq!(ts.to_string(), "2025-10-13 05:00:00");
/// assert!(parse_timestamp("Time").is_err());
/// ```
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, TimestampFormatError> {
    let trimmed = text.trim();

    if let Some(ts) = parse_iso(trimmed) {
        return Ok(ts);
    }

    for fmt in FALLBACK_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(TimestampFormatError {
        raw: text.to_owned(),
    })
}

/// Parse a `dd.mm.yyyy` date, as typed by a user (leading zeros optional).
pub fn parse_fi_date(text: &str) -> Result<NaiveDate, TimestampFormatError> {
    NaiveDate::parse_from_str(text.trim(), "%d.%m.%Y").map_err(|_| TimestampFormatError {
        raw: text.to_owned(),
    })
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let (date, time) = s.split_once(['T', 't', ' '])?;
    let date = NaiveDate::parse_from_str(date, DATE_ONLY_FORMAT).ok()?;
    let time = strip_zone(time)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(date.and_time(time))
}

/// Remove a trailing zone designator from the time part of an ISO-8601 timestamp.
///
/// Returns `None` when something that looks like a designator is malformed.
fn strip_zone(time: &str) -> Option<&str> {
    if let Some(rest) = time.strip_suffix(['Z', 'z']) {
        return Some(rest);
    }

    let Some(idx) = time.find(['+', '-']) else {
        return Some(time);
    };

    let (clock, zone) = time.split_at(idx);
    let offset = zone[1..].as_bytes();
    let well_formed = match offset.len() {
        2 | 4 => offset.iter().all(u8::is_ascii_digit),
        5 => offset[2] == b':' && [0, 1, 3, 4].iter().all(|&i| offset[i].is_ascii_digit()),
        _ => false,
    };

    well_formed.then_some(clock)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn iso_forms_are_accepted() {
        assert_eq!(parse_timestamp("2025-10-13T00:00:00").unwrap(), dt("2025-10-13 00:00:00"));
        assert_eq!(parse_timestamp("2025-10-13T07:30").unwrap(), dt("2025-10-13 07:30:00"));
        assert_eq!(
            parse_timestamp("2025-01-01T00:00:00.000+02:00").unwrap(),
            dt("2025-01-01 00:00:00")
        );
        assert_eq!(parse_timestamp("2025-10-13T23:00:00Z").unwrap(), dt("2025-10-13 23:00:00"));
        assert_eq!(parse_timestamp("2025-10-13T23:00:00-0500").unwrap(), dt("2025-10-13 23:00:00"));
    }

    #[test]
    fn iso_forms_with_space_separator_are_accepted() {
        assert_eq!(parse_timestamp("2025-10-13 05:00:00+03:00").unwrap(), dt("2025-10-13 05:00:00"));
        assert_eq!(parse_timestamp("2025-10-13 05:00:00.000").unwrap(), dt("2025-10-13 05:00:00"));
        assert_eq!(parse_timestamp("2025-10-13 05:00:00Z").unwrap(), dt("2025-10-13 05:00:00"));
        assert_eq!(
            parse_timestamp("2025-01-01 00:00:00.000+02:00").unwrap(),
            dt("2025-01-01 00:00:00")
        );
        assert!(parse_timestamp("2025-10-13 05:00:00+junk").is_err());
    }

    #[test]
    fn zone_designator_does_not_shift_the_date() {
        let ts = parse_timestamp("2025-10-19T23:00:00-10:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 10, 19).unwrap());
    }

    #[test]
    fn fallback_layouts_are_accepted() {
        assert_eq!(parse_timestamp("2025-10-13 01:00:00").unwrap(), dt("2025-10-13 01:00:00"));
        assert_eq!(parse_timestamp("2025-10-13 01:00").unwrap(), dt("2025-10-13 01:00:00"));
        assert_eq!(parse_timestamp("2025/10/13 01:00").unwrap(), dt("2025-10-13 01:00:00"));
        assert_eq!(parse_timestamp("2025/10/13 01:00:30").unwrap(), dt("2025-10-13 01:00:30"));
        assert_eq!(parse_timestamp("13.10.2025 01:00:00").unwrap(), dt("2025-10-13 01:00:00"));
        assert_eq!(parse_timestamp("  2025-10-13 ").unwrap(), dt("2025-10-13 00:00:00"));
    }

    #[test]
    fn unrecognized_input_is_reported_verbatim() {
        for bad in ["", "Time", "2025-13-01T00:00:00", "2025-10-13T00:00:00+junk", "13/10/2025"] {
            let err = parse_timestamp(bad).unwrap_err();
            assert_eq!(err.raw, bad);
        }
    }

    #[test]
    fn date_component_survives_dd_mm_yyyy_formatting() {
        let tokens = [
            ("2025-10-13T00:00:00", "13.10.2025"),
            ("2025-02-03 23:59:59", "03.02.2025"),
            ("2024/12/31 23:00", "31.12.2024"),
            ("2025-10-05", "05.10.2025"),
            ("2025-10-06T10:00:00Z", "06.10.2025"),
        ];
        for (token, expected) in tokens {
            let ts = parse_timestamp(token).unwrap();
            assert_eq!(ts.format("%d.%m.%Y").to_string(), expected, "token {token}");
        }
    }

    #[test]
    fn fi_date_input() {
        assert_eq!(
            parse_fi_date("1.11.2025").unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
        );
        assert_eq!(
            parse_fi_date("13.10.2025").unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 13).unwrap()
        );
        assert!(parse_fi_date("2025-10-13").is_err());
    }
}
