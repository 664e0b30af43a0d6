//! Pure display-formatting functions.
//!
//! Monetary values are rounded here and only here; aggregation accumulates
//! at full precision.

use chrono::{DateTime, NaiveDate, Utc};
use granary_shared::types::Currency;
use rust_decimal::Decimal;

use super::error::FormatError;
use crate::reports::{CellFormat, CellValue, SummaryValue};

/// Formats a table cell according to its column format.
///
/// A `Null` value renders as `-` regardless of format. A `Date` format over
/// text parses the text as an ISO calendar date; anything unparseable is a
/// caller error, not silently passed through.
///
/// # Errors
///
/// Returns `FormatError` when the format cannot render the value.
pub fn cell(
    value: &CellValue,
    format: CellFormat,
    currency: Currency,
) -> Result<String, FormatError> {
    match (value, format) {
        (CellValue::Null, _) => Ok("-".to_string()),
        (CellValue::Amount(d) | CellValue::Number(d), CellFormat::Currency) => {
            Ok(amount(*d, currency))
        }
        (CellValue::Date(d), CellFormat::Date) => Ok(date(*d)),
        (CellValue::Text(s), CellFormat::Date) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(date)
            .map_err(|_| FormatError::UnparseableDate(s.clone())),
        (CellValue::Amount(d) | CellValue::Number(d), CellFormat::Number) => Ok(number(*d)),
        (CellValue::Text(s), CellFormat::Text) => Ok(s.clone()),
        (CellValue::Amount(d) | CellValue::Number(d), CellFormat::Text) => {
            Ok(d.normalize().to_string())
        }
        (CellValue::Date(d), CellFormat::Text) => Ok(d.to_string()),
        (value, format) => Err(FormatError::Incompatible {
            value: value.kind(),
            format: format.as_str(),
        }),
    }
}

/// Formats a summary entry value.
///
/// Text entries (percentages, tax year) render verbatim; they never pass
/// through currency formatting.
#[must_use]
pub fn summary(value: &SummaryValue, currency: Currency) -> String {
    match value {
        SummaryValue::Amount(d) => amount(*d, currency),
        SummaryValue::Count(n) => number(Decimal::from(*n)),
        SummaryValue::Text(s) => s.clone(),
    }
}

/// Formats a monetary amount: symbol, thousands grouping, fixed fraction
/// digits. Negative amounts carry the sign before the symbol (`-$12.50`),
/// matching the locale convention.
#[must_use]
pub fn amount(value: Decimal, currency: Currency) -> String {
    let places = currency.decimal_places() as usize;
    let rounded = value.round_dp(currency.decimal_places());

    let magnitude = rounded.abs().to_string();
    let (whole, mut frac) = match magnitude.split_once('.') {
        Some((w, f)) => (w.to_string(), f.to_string()),
        None => (magnitude, String::new()),
    };
    while frac.len() < places {
        frac.push('0');
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let symbol = currency.symbol();
    let grouped = group_thousands(&whole);
    if frac.is_empty() {
        format!("{sign}{symbol}{grouped}")
    } else {
        format!("{sign}{symbol}{grouped}.{frac}")
    }
}

/// Formats a plain number with thousands grouping. Integral values render
/// without decimals; fractional values keep their digits as given.
#[must_use]
pub fn number(value: Decimal) -> String {
    let normalized = value.normalize();
    let text = normalized.abs().to_string();
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let sign = if normalized.is_sign_negative() { "-" } else { "" };
    let grouped = group_thousands(&whole);
    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a calendar date (e.g., "Jan 05, 2026").
#[must_use]
pub fn date(value: NaiveDate) -> String {
    value.format("%b %d, %Y").to_string()
}

/// Formats a generation timestamp (e.g., "January 05, 2026 14:30").
#[must_use]
pub fn timestamp(value: DateTime<Utc>) -> String {
    value.format("%B %d, %Y %H:%M").to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
