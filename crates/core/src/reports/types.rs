//! Report document types.
//!
//! The `ReportDocument` is the format-agnostic intermediate representation
//! produced by the aggregation service and consumed by both exporters. It is
//! constructed once per report request and read-only afterward.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;

/// Inclusive date window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a date range, rejecting windows that end before they start.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }
}

/// Display format applied to a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Monetary value with symbol and two fraction digits.
    Currency,
    /// Human-readable calendar date.
    Date,
    /// Grouped-thousands number.
    Number,
    /// Verbatim text.
    #[default]
    Text,
}

impl CellFormat {
    /// Format name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Number => "number",
            Self::Text => "text",
        }
    }
}

/// Typed payload of a single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Absent value; renders as a dash.
    Null,
    /// Free text.
    Text(String),
    /// Monetary amount.
    Amount(Decimal),
    /// Plain number (quantity, count).
    Number(Decimal),
    /// Calendar date.
    Date(NaiveDate),
}

impl CellValue {
    /// Value kind used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Amount(_) => "amount",
            Self::Number(_) => "number",
            Self::Date(_) => "date",
        }
    }
}

/// A table row, keyed by `ColumnSpec::key`.
pub type Row = HashMap<String, CellValue>;

/// Column declaration for a table section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Display label.
    pub header: String,
    /// Row field to read.
    pub key: String,
    /// Display format for cells in this column.
    pub format: CellFormat,
}

impl ColumnSpec {
    /// Creates a column specification.
    #[must_use]
    pub fn new(header: &str, key: &str, format: CellFormat) -> Self {
        Self {
            header: header.to_string(),
            key: key.to_string(),
            format,
        }
    }
}

/// Rendering kind of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Tabular data (the only kind currently populated).
    Table,
}

/// A titled, ordered group of rows within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section title; unique within a document.
    pub title: String,
    /// Rendering kind.
    pub kind: SectionKind,
    /// Column declarations; required when rows are non-empty.
    pub columns: Vec<ColumnSpec>,
    /// Row data.
    pub rows: Vec<Row>,
}

/// Display treatment of a summary entry, decided at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SummaryValue {
    /// Monetary amount; rendered through currency formatting.
    Amount(Decimal),
    /// Record count; rendered as a grouped integer.
    Count(u64),
    /// Pre-rendered text (percentages, tax year); rendered verbatim.
    Text(String),
}

/// A single top-level KPI entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Display label.
    pub label: String,
    /// Value with its display treatment.
    pub value: SummaryValue,
}

impl SummaryEntry {
    /// Creates a monetary summary entry.
    #[must_use]
    pub fn amount(label: &str, amount: Decimal) -> Self {
        Self {
            label: label.to_string(),
            value: SummaryValue::Amount(amount),
        }
    }

    /// Creates a record-count summary entry.
    #[must_use]
    pub fn count(label: &str, count: usize) -> Self {
        Self {
            label: label.to_string(),
            value: SummaryValue::Count(u64::try_from(count).unwrap_or(0)),
        }
    }

    /// Creates a pre-rendered text summary entry.
    #[must_use]
    pub fn text(label: &str, text: String) -> Self {
        Self {
            label: label.to_string(),
            value: SummaryValue::Text(text),
        }
    }
}

/// The format-agnostic representation of a generated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Report title.
    pub title: String,
    /// Subtitle (the farm name).
    pub subtitle: Option<String>,
    /// When the document was aggregated.
    pub generated_at: DateTime<Utc>,
    /// Date window; absent for point-in-time reports.
    pub date_range: Option<DateRange>,
    /// Top-level KPIs; vector order is display order.
    pub summary: Vec<SummaryEntry>,
    /// Sections in stable export order.
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    /// Looks up a section by its title.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Looks up a summary value by its label.
    #[must_use]
    pub fn summary_value(&self, label: &str) -> Option<&SummaryValue> {
        self.summary
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.value)
    }
}
