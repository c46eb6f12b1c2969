//! Locale-tolerant quantity parsing.

use serde::Deserialize;

use crate::error::NumericFormatError;

/// What to do with a numeric field that is not a valid quantity.
///
/// Empty fields are always zero; the policy only decides the fate of text that is present
/// but unparsable (or negative / non-finite).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Reject the value; the whole read fails.
    #[default]
    Strict,
    /// Substitute zero and count the substitution.
    Lenient,
}

/// Outcome of parsing one numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    /// The text parsed (empty text counts as a parsed zero).
    Parsed(f64),
    /// The text was invalid and [`NumericPolicy::Lenient`] replaced it with zero.
    Substituted,
}

impl Quantity {
    pub fn value(self) -> f64 {
        match self {
            Self::Parsed(v) => v,
            Self::Substituted => 0.0,
        }
    }
}

/// Parse a meter quantity that may use either `.` or `,` as decimal separator.
///
/// Rules, in order: trim surrounding whitespace (non-breaking space included), empty text
/// is zero, a decimal comma becomes a decimal point, then the text must parse as a finite,
/// non-negative `f64`. Invalid text is an error under [`NumericPolicy::Strict`] and
/// [`Quantity::Substituted`] under [`NumericPolicy::Lenient`].
///
/// ```
/// use energy_report::parse::{parse_quantity, NumericPolicy};
///
/// let dot = parse_quantity("19.95", NumericPolicy::Strict).unwrap().value();
/// let comma = parse_quantity("19,95", NumericPolicy::Strict).unwrap().value();
/// assert_eq!(dot, comma);
/// ```
pub fn parse_quantity(raw: &str, policy: NumericPolicy) -> Result<Quantity, NumericFormatError> {
    match normalize(raw) {
        Ok(v) => Ok(Quantity::Parsed(v)),
        Err(e) => match policy {
            NumericPolicy::Strict => Err(e),
            NumericPolicy::Lenient => Ok(Quantity::Substituted),
        },
    }
}

fn normalize(raw: &str) -> Result<f64, NumericFormatError> {
    // `str::trim` covers U+00A0 and the other Unicode white space characters.
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let reject = |reason: &str| NumericFormatError {
        raw: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|e: std::num::ParseFloatError| reject(&e.to_string()))?;

    if !value.is_finite() {
        return Err(reject("not a finite number"));
    }
    if value < 0.0 {
        return Err(reject("negative quantity"));
    }

    // Collapse -0.0 so it never renders as "-0,00".
    Ok(value.abs())
}
