//! Delimiter and header sniffing.
//!
//! Sniffing is a pure function over a sample buffer so it can be tested without files.

use crate::parse::parse_timestamp;
use crate::types::Dialect;

/// Delimiters considered by [`sniff_dialect`].
pub const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Default size of the prefix handed to the sniffer.
pub const DEFAULT_SNIFF_BYTES: usize = 4096;

const MAX_SNIFF_LINES: usize = 32;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strip a leading UTF-8 byte-order mark, if any.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Guess the delimiter and header presence of delimited text.
///
/// Each candidate delimiter is counted per sampled line. A delimiter that occurs the same
/// non-zero number of times on every line is preferred (the highest such count wins);
/// otherwise the delimiter with the highest total count wins. Ties and samples with no
/// candidate at all fall back to [`Dialect::DEFAULT_DELIMITER`]. A trailing partial line
/// (sample cut mid-line) is ignored.
///
/// `has_header` is set when the first field of the first non-blank line is not a timestamp.
///
/// ```
/// use energy_report::ingestion::dialect::sniff_dialect;
///
/// let d = sniff_dialect("Time,Cons 1,Cons 2\n2025-10-13T00:00:00,1,2\n");
/// assert_eq!(d.delimiter, b',');
/// assert!(d.has_header);
/// ```
pub fn sniff_dialect(sample: &str) -> Dialect {
    let lines = sample_lines(sample);
    let delimiter = pick_delimiter(&lines);
    let has_header = lines
        .first()
        .map(|line| !first_field_is_timestamp(line, delimiter))
        .unwrap_or(false);

    Dialect {
        delimiter,
        has_header,
    }
}

/// Complete, non-blank lines of the sample.
fn sample_lines(sample: &str) -> Vec<&str> {
    let complete = match sample.rfind('\n') {
        Some(idx) if !sample.ends_with('\n') => &sample[..idx],
        _ => sample,
    };
    complete
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(MAX_SNIFF_LINES)
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Score {
    delimiter: u8,
    /// Per-line count when every line agrees, else `None`.
    consistent: Option<usize>,
    total: usize,
}

fn pick_delimiter(lines: &[&str]) -> u8 {
    let scores: Vec<Score> = CANDIDATE_DELIMITERS
        .iter()
        .map(|&d| score(lines, d))
        .collect();

    let consistent: Vec<(u8, usize)> = scores
        .iter()
        .filter_map(|s| s.consistent.map(|n| (s.delimiter, n)))
        .collect();

    if !consistent.is_empty() {
        return unique_max(&consistent).unwrap_or(Dialect::DEFAULT_DELIMITER);
    }

    let totals: Vec<(u8, usize)> = scores
        .iter()
        .filter(|s| s.total > 0)
        .map(|s| (s.delimiter, s.total))
        .collect();
    unique_max(&totals).unwrap_or(Dialect::DEFAULT_DELIMITER)
}

fn score(lines: &[&str], delimiter: u8) -> Score {
    let counts: Vec<usize> = lines
        .iter()
        .map(|l| l.bytes().filter(|&b| b == delimiter).count())
        .collect();
    let total = counts.iter().sum();
    let consistent = match counts.first() {
        Some(&first) if first > 0 && counts.iter().all(|&c| c == first) => Some(first),
        _ => None,
    };

    Score {
        delimiter,
        consistent,
        total,
    }
}

/// The delimiter with the strictly highest count, or `None` on a tie.
fn unique_max(counts: &[(u8, usize)]) -> Option<u8> {
    let max = counts.iter().map(|&(_, n)| n).max()?;
    let mut winners = counts.iter().filter(|&&(_, n)| n == max);
    let (delimiter, _) = winners.next()?;
    winners.next().is_none().then_some(*delimiter)
}

fn first_field_is_timestamp(line: &str, delimiter: u8) -> bool {
    let first = line.split(char::from(delimiter)).next().unwrap_or_default();
    parse_timestamp(first.trim().trim_matches('"')).is_ok()
}
