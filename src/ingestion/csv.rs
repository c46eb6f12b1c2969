//! Hourly meter CSV ingestion.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Deserialize;

use crate::error::{IngestionError, IngestionResult, RowError, SchemaDetectionError};
use crate::parse::{parse_quantity, parse_timestamp, NumericPolicy, Quantity};
use crate::types::{ColumnMapping, ColumnRef, Dialect, HourlyRecord, PhaseValues, PHASES};

use super::columns::detect_columns;
use super::dialect::{sniff_dialect, strip_bom, DEFAULT_SNIFF_BYTES};

/// How columns are assigned to logical fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Use the header row when there is one, the positional layout otherwise.
    #[default]
    Auto,
    /// A header row is required and drives the mapping.
    Named,
    /// Column 0 = timestamp, 1-3 = consumption, 4-6 = production. A header row, if
    /// present, is skipped without being interpreted.
    Positional,
}

/// Options for reading one hourly file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field delimiter. `None` sniffs it from the start of the file.
    pub delimiter: Option<u8>,
    pub layout: Layout,
    /// Failure policy for numeric fields.
    pub numeric_policy: NumericPolicy,
    /// Size of the prefix inspected by the sniffer.
    pub sniff_bytes: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            layout: Layout::Auto,
            numeric_policy: NumericPolicy::Strict,
            sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }
}

/// The records of one file plus what was learned about its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyFile {
    /// Input path, or the label given for in-memory input.
    pub path: PathBuf,
    pub dialect: Dialect,
    pub mapping: ColumnMapping,
    /// Header labels, when the file had a header row.
    pub header: Option<Vec<String>>,
    /// Records in input order.
    pub records: Vec<HourlyRecord>,
    /// Numeric fields replaced by zero under [`NumericPolicy::Lenient`].
    pub substituted_fields: usize,
}

/// Read an hourly meter file.
///
/// Rules:
///
/// - A UTF-8 byte-order mark is stripped.
/// - The delimiter is sniffed from the first [`ReadOptions::sniff_bytes`] bytes unless set.
/// - The first non-blank row whose first field is not a timestamp is the header; it is
///   consumed at most once. With [`Layout::Auto`] its labels go through
///   [`detect_columns`]; a file without header uses [`ColumnMapping::positional`].
/// - Blank rows are ignored. Any other row that fails to parse aborts the whole read with
///   the file name and 1-based line number; no partial result is returned.
pub fn read_hourly_from_path(path: impl AsRef<Path>, options: &ReadOptions) -> IngestionResult<HourlyFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| IngestionError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    read_hourly_from_bytes(path, &bytes, options)
}

/// Read hourly data from any reader. `label` names the input in errors.
pub fn read_hourly_from_reader<R: Read>(
    label: impl AsRef<Path>,
    mut reader: R,
    options: &ReadOptions,
) -> IngestionResult<HourlyFile> {
    let label = label.as_ref();
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| IngestionError::FileAccess {
            path: label.to_path_buf(),
            source,
        })?;
    read_hourly_from_bytes(label, &bytes, options)
}

/// Read hourly data held in memory. `label` names the input in errors.
pub fn read_hourly_from_str(
    label: impl AsRef<Path>,
    input: &str,
    options: &ReadOptions,
) -> IngestionResult<HourlyFile> {
    read_hourly_from_bytes(label.as_ref(), input.as_bytes(), options)
}

fn read_hourly_from_bytes(path: &Path, bytes: &[u8], options: &ReadOptions) -> IngestionResult<HourlyFile> {
    let bytes = strip_bom(bytes);
    let sample_len = bytes.len().min(options.sniff_bytes);
    let sniffed = sniff_dialect(&String::from_utf8_lossy(&bytes[..sample_len]));
    let delimiter = options.delimiter.unwrap_or(sniffed.delimiter);

    let csv_err = |source: csv::Error| IngestionError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let schema_err = |source: SchemaDetectionError| IngestionError::Schema {
        path: path.to_path_buf(),
        source,
    };

    let rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = rdr
        .into_records()
        .filter(|r| !matches!(r, Ok(record) if is_blank(record)));

    let first = rows.next().transpose().map_err(csv_err)?;

    let (mapping, header, first_data) = match first {
        None if options.layout == Layout::Named => {
            return Err(schema_err(SchemaDetectionError::MissingHeader));
        }
        None => (ColumnMapping::positional(), None, None),
        Some(record) if parse_timestamp(record.get(0).unwrap_or_default()).is_err() => {
            let labels: Vec<String> = record.iter().map(str::to_owned).collect();
            let mapping = match options.layout {
                Layout::Auto | Layout::Named => detect_columns(&labels).map_err(schema_err)?,
                Layout::Positional => ColumnMapping::positional(),
            };
            (mapping, Some(labels), None)
        }
        Some(_) if options.layout == Layout::Named => {
            return Err(schema_err(SchemaDetectionError::MissingHeader));
        }
        Some(record) => (ColumnMapping::positional(), None, Some(record)),
    };

    let mut records = Vec::new();
    let mut substituted_fields = 0;

    for result in first_data.map(Ok).into_iter().chain(rows) {
        let record = result.map_err(csv_err)?;
        let parsed = parse_row(&record, &mapping, options.numeric_policy, &mut substituted_fields);
        match parsed {
            Ok(hourly) => records.push(hourly),
            Err(source) => {
                return Err(IngestionError::Row {
                    path: path.to_path_buf(),
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    raw: join_record(&record, delimiter),
                    source,
                });
            }
        }
    }

    Ok(HourlyFile {
        path: path.to_path_buf(),
        dialect: Dialect {
            delimiter,
            has_header: header.is_some(),
        },
        mapping,
        header,
        records,
        substituted_fields,
    })
}

fn parse_row(
    record: &StringRecord,
    mapping: &ColumnMapping,
    policy: NumericPolicy,
    substituted: &mut usize,
) -> Result<HourlyRecord, RowError> {
    let needed = mapping.min_fields();
    if record.len() < needed {
        return Err(RowError::TooFewFields {
            found: record.len(),
            needed,
        });
    }
    let field = |col: &ColumnRef| record.get(col.index).unwrap_or_default();

    let timestamp = parse_timestamp(field(&mapping.timestamp))?;

    let mut phases = |cols: &[ColumnRef; PHASES]| -> Result<PhaseValues, RowError> {
        let mut values = PhaseValues::ZERO;
        for (slot, col) in values.0.iter_mut().zip(cols) {
            let quantity = parse_quantity(field(col), policy).map_err(|source| RowError::Numeric {
                column: col.label.clone(),
                source,
            })?;
            if quantity == Quantity::Substituted {
                *substituted += 1;
            }
            *slot = quantity.value();
        }
        Ok(values)
    };

    let consumption = phases(&mapping.consumption)?;
    let production = phases(&mapping.production)?;

    Ok(HourlyRecord::new(timestamp, consumption, production))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

fn join_record(record: &StringRecord, delimiter: u8) -> String {
    record
        .iter()
        .collect::<Vec<_>>()
        .join(char::from(delimiter).to_string().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "Time;Consumption phase 1 Wh;Consumption phase 2 Wh;Consumption phase 3 Wh;\
                          Production phase 1 Wh;Production phase 2 Wh;Production phase 3 Wh";

    fn read(input: &str) -> IngestionResult<HourlyFile> {
        read_hourly_from_str("mem.csv", input, &ReadOptions::default())
    }

    #[test]
    fn header_row_drives_mapping() {
        let input = format!("{HEADER}\n2025-10-13T00:00:00;1000;2000;3000;10;20;30\n");
        let file = read(&input).unwrap();
        assert_eq!(file.records.len(), 1);
        assert!(file.dialect.has_header);
        assert_eq!(file.dialect.delimiter, b';');
        let r = file.records[0];
        assert_eq!(r.consumption, PhaseValues::new(1000.0, 2000.0, 3000.0));
        assert_eq!(r.production, PhaseValues::new(10.0, 20.0, 30.0));
        assert_eq!(r.date(), NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
    }

    #[test]
    fn positional_file_without_header() {
        let input = "2025-10-13 00:00:00,1,2,3,4,5,6\n2025-10-13 01:00:00,1,2,3,4,5,6,extra\n";
        let file = read(input).unwrap();
        assert_eq!(file.records.len(), 2);
        assert!(file.header.is_none());
        assert_eq!(file.mapping, ColumnMapping::positional());
    }

    #[test]
    fn bom_and_blank_lines_are_tolerated() {
        let input = format!("\u{feff}{HEADER}\n\n2025-10-13T00:00:00;1;2;3;4;5;6\n;;;;;;\n\n");
        let file = read(&input).unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.mapping.timestamp.label, "Time");
    }

    #[test]
    fn empty_production_field_is_zero() {
        let input = format!("{HEADER}\n2025-10-13T00:00:00;1;2;3;4;;6\n");
        let file = read(&input).unwrap();
        assert_eq!(file.records[0].production, PhaseValues::new(4.0, 0.0, 6.0));
        assert_eq!(file.substituted_fields, 0);
    }

    #[test]
    fn empty_production_field_is_zero_when_lenient() {
        let input = format!("{HEADER}\n2025-10-13T00:00:00;1;2;3;4;;6\n");
        let options = ReadOptions {
            numeric_policy: NumericPolicy::Lenient,
            ..Default::default()
        };
        let file = read_hourly_from_str("mem.csv", &input, &options).unwrap();
        assert_eq!(file.records[0].production[1], 0.0);
        assert_eq!(file.substituted_fields, 0);
    }

    #[test]
    fn space_separated_iso_timestamps_with_zone() {
        let input = format!(
            "{HEADER}\n2025-10-13 00:00:00+02:00;1;2;3;4;5;6\n2025-10-13 01:00:00.000Z;1;2;3;4;5;6\n"
        );
        let file = read(&input).unwrap();
        assert!(file.dialect.has_header);
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[1].timestamp.to_string(), "2025-10-13 01:00:00");

        let headerless = read("2025-10-13 00:00:00+02:00;1;2;3;4;5;6\n").unwrap();
        assert!(headerless.header.is_none());
        assert_eq!(headerless.records[0].date(), NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
    }

    #[test]
    fn short_named_row_reports_field_counts() {
        let input = format!("{HEADER}\n2025-10-13T00:00:00;1;2;3;4\n");
        let err = read(&input).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("row has 5 fields, needs 7"), "{err}");
    }

    #[test]
    fn bad_timestamp_on_data_row_names_line() {
        let input = format!(
            "{HEADER}\n2025-10-13T00:00:00;1;2;3;4;5;6\n2025-10-13T01:00:00;1;2;3;4;5;6\nlater;1;2;3;4;5;6\n"
        );
        let err = read(&input).unwrap_err();
        assert_eq!(err.line(), Some(4));
        match err {
            IngestionError::Row { source: RowError::Timestamp(e), .. } => assert_eq!(e.raw, "later"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_is_skipped_only_once() {
        let input = format!("{HEADER}\n{HEADER}\n2025-10-13T00:00:00;1;2;3;4;5;6\n");
        let err = read(&input).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn strict_policy_rejects_bad_number() {
        let input = format!("{HEADER}\n2025-10-13T00:00:00;1;x;3;4;5;6\n");
        let err = read(&input).unwrap_err();
        match err {
            IngestionError::Row { line, source: RowError::Numeric { column, .. }, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "Consumption phase 2 Wh");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lenient_policy_substitutes_and_counts() {
        let input = format!("{HEADER}\n2025-10-13T00:00:00;1;x;3;4;n/a;6\n");
        let options = ReadOptions {
            numeric_policy: NumericPolicy::Lenient,
            ..Default::default()
        };
        let file = read_hourly_from_str("mem.csv", &input, &options).unwrap();
        assert_eq!(file.records[0].consumption, PhaseValues::new(1.0, 0.0, 3.0));
        assert_eq!(file.records[0].production, PhaseValues::new(4.0, 0.0, 6.0));
        assert_eq!(file.substituted_fields, 2);
    }

    #[test]
    fn short_positional_row_is_fatal() {
        let err = read("2025-10-13 00:00:00;1;2;3\n").unwrap_err();
        match err {
            IngestionError::Row { line, source: RowError::TooFewFields { found, needed }, .. } => {
                assert_eq!(line, 1);
                assert_eq!((found, needed), (4, 7));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn undetectable_header_is_fatal_in_auto_layout() {
        let err = read("Time;A;B;C;D;E;F\n2025-10-13T00:00:00;1;2;3;4;5;6\n").unwrap_err();
        assert!(matches!(err, IngestionError::Schema { .. }));
    }

    #[test]
    fn positional_layout_skips_any_header() {
        let options = ReadOptions {
            layout: Layout::Positional,
            ..Default::default()
        };
        let file =
            read_hourly_from_str("mem.csv", "Time;A;B;C;D;E;F\n2025-10-13T00:00:00;1;2;3;4;5;6\n", &options).unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.header.as_deref().map(<[String]>::len), Some(7));
    }

    #[test]
    fn named_layout_requires_header() {
        let options = ReadOptions {
            layout: Layout::Named,
            ..Default::default()
        };
        let err = read_hourly_from_str("mem.csv", "2025-10-13T00:00:00;1;2;3;4;5;6\n", &options).unwrap_err();
        assert!(matches!(
            err,
            IngestionError::Schema {
                source: SchemaDetectionError::MissingHeader,
                ..
            }
        ));
    }

    #[test]
    fn explicit_delimiter_overrides_sniffing() {
        let options = ReadOptions {
            delimiter: Some(b'\t'),
            ..Default::default()
        };
        let input = "2025-10-13T00:00:00\t1,5\t2\t3\t4\t5\t6\n";
        let file = read_hourly_from_str("mem.tsv", input, &options).unwrap();
        assert_eq!(file.records[0].consumption[0], 1.5);
        assert_eq!(file.dialect.delimiter, b'\t');
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let err = read_hourly_from_path("definitely/not/here.csv", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::FileAccess { .. }));
        assert!(err.to_string().contains("definitely/not/here.csv"));
    }

    #[test]
    fn empty_input_yields_no_records() {
        let file = read("").unwrap();
        assert!(file.records.is_empty());
        assert!(!file.dialect.has_header);
    }
}
