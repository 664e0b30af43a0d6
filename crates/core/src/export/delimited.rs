//! Delimited (CSV) export.
//!
//! Line-oriented rendering: header lines, a summary block, then one block
//! per section. Every emitted field obeys the canonical escaping rule: a
//! field containing a comma or a double quote is wrapped in double quotes
//! with embedded quotes doubled, so emitted lines re-split into the exact
//! formatted strings.

use granary_shared::types::Currency;
use tracing::debug;

use super::delivery::{MIME_CSV, RenderedArtifact};
use super::error::ExportError;
use super::types::ExportOptions;
use crate::format;
use crate::reports::{ReportDocument, ReportSection};

/// Renders a document into a CSV artifact.
///
/// # Errors
///
/// Returns `ExportError` on a malformed section (rows without columns) or a
/// cell that cannot be formatted.
pub fn render(
    document: &ReportDocument,
    options: &ExportOptions,
) -> Result<RenderedArtifact, ExportError> {
    let mut lines: Vec<String> = Vec::new();

    lines.push(quote(&document.title));
    if let Some(subtitle) = &document.subtitle {
        lines.push(quote(subtitle));
    }
    if let Some(range) = &document.date_range {
        lines.push(quote(&format!(
            "Period: {} - {}",
            format::date(range.start),
            format::date(range.end)
        )));
    }
    lines.push(quote(&format!(
        "Generated: {}",
        format::timestamp(document.generated_at)
    )));
    lines.push(String::new());

    if !document.summary.is_empty() {
        lines.push("Summary".to_string());
        for entry in &document.summary {
            let value = format::summary(&entry.value, options.currency);
            lines.push(format!("{},{}", quote(&entry.label), quote(&value)));
        }
        lines.push(String::new());
    }

    for section in &document.sections {
        render_section(&mut lines, section, options.currency)?;
    }

    let content = lines.join("\n");
    debug!(bytes = content.len(), "rendered delimited export");
    Ok(RenderedArtifact::new(
        &document.title,
        content.into_bytes(),
        MIME_CSV,
        "csv",
    ))
}

fn render_section(
    lines: &mut Vec<String>,
    section: &ReportSection,
    currency: Currency,
) -> Result<(), ExportError> {
    lines.push(quote(&section.title));

    if section.rows.is_empty() {
        lines.push("No data available".to_string());
    } else {
        if section.columns.is_empty() {
            return Err(ExportError::MissingColumns(section.title.clone()));
        }

        lines.push(
            section
                .columns
                .iter()
                .map(|column| quote_always(&column.header))
                .collect::<Vec<_>>()
                .join(","),
        );

        for row in &section.rows {
            let mut fields = Vec::with_capacity(section.columns.len());
            for column in &section.columns {
                let formatted = match row.get(&column.key) {
                    Some(value) => format::cell(value, column.format, currency)?,
                    None => "-".to_string(),
                };
                fields.push(quote(&formatted));
            }
            lines.push(fields.join(","));
        }
    }

    lines.push(String::new());
    Ok(())
}

/// Quotes a field only when it contains a comma or a double quote, doubling
/// embedded quotes.
fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        quote_always(field)
    } else {
        field.to_string()
    }
}

/// Column headers are always quoted.
fn quote_always(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::records::{ExpenseLineItem, ExpenseRecord};
    use crate::reports::{DateRange, ReportService};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Splits one emitted line back into fields by the documented rule.
    fn split_line(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if quoted {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        quoted = false;
                    }
                } else {
                    current.push(c);
                }
            } else if c == '"' {
                quoted = true;
            } else if c == ',' {
                fields.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        fields.push(current);
        fields
    }

    #[test]
    fn test_quote_plain_field_unchanged() {
        assert_eq!(quote("Seed"), "Seed");
        assert_eq!(quote("$1.50"), "$1.50");
    }

    #[test]
    fn test_quote_comma_and_quotes() {
        assert_eq!(
            quote("Smith, \"Big\" Farm"),
            "\"Smith, \"\"Big\"\" Farm\""
        );
        assert_eq!(quote("$1,234.56"), "\"$1,234.56\"");
    }

    #[test]
    fn test_split_line_round_trips() {
        let fields = ["Smith, \"Big\" Farm", "plain", "$1,234.56", "", "\"quoted\""];
        let line = fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",");
        let recovered = split_line(&line);
        assert_eq!(recovered, fields);
    }

    #[test]
    fn test_render_block_structure() {
        let expenses = vec![ExpenseRecord {
            date: date(2026, 2, 10),
            vendor: Some("Acme Seed Co".to_string()),
            description: Some("Spring planting".to_string()),
            grand_total: dec!(150),
            line_items: vec![
                ExpenseLineItem {
                    category: "Seed".to_string(),
                    line_total: dec!(100),
                },
                ExpenseLineItem {
                    category: "Fuel".to_string(),
                    line_total: dec!(50),
                },
            ],
        }];
        let range = DateRange::new(date(2026, 1, 1), date(2026, 3, 31)).unwrap();
        let document = ReportService::generate_expense_report(&expenses, range, "Sunrise Farm");

        let artifact = render(&document, &ExportOptions::default()).unwrap();
        let content = String::from_utf8(artifact.bytes).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "Expense Report");
        assert_eq!(lines[1], "Sunrise Farm");
        // The period line contains commas, so the whole field is quoted.
        assert_eq!(lines[2], "\"Period: Jan 01, 2026 - Mar 31, 2026\"");
        assert!(lines[3].starts_with("Generated: ") || lines[3].starts_with("\"Generated: "));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Summary");
        assert_eq!(lines[6], "Total Expenses,$150.00");
        assert_eq!(lines[7], "Number of Transactions,1");
        assert_eq!(lines[8], "Average Expense,$150.00");
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], "Expense Summary by Category");
        assert_eq!(lines[11], "\"Category\",\"Amount\",\"% of Total\"");
        assert_eq!(lines[12], "Seed,$100.00,66.7%");
        assert_eq!(lines[13], "Fuel,$50.00,33.3%");

        assert_eq!(artifact.mime_type, "text/csv");
        assert!(artifact.filename.starts_with("expense-report-"));
        assert!(artifact.filename.ends_with(".csv"));
    }

    #[test]
    fn test_render_escapes_currency_with_grouping() {
        let expenses = vec![ExpenseRecord {
            date: date(2026, 2, 10),
            vendor: None,
            description: None,
            grand_total: dec!(1500),
            line_items: vec![],
        }];
        let range = DateRange::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        let document = ReportService::generate_expense_report(&expenses, range, "Sunrise Farm");

        let artifact = render(&document, &ExportOptions::default()).unwrap();
        let content = String::from_utf8(artifact.bytes).unwrap();

        // $1,500.00 contains a comma, so it must be quoted everywhere it
        // appears and must re-split to the exact formatted string.
        for line in content.lines().filter(|l| l.contains("1,500.00")) {
            let fields = split_line(line);
            assert!(
                fields.iter().any(|f| f == "$1,500.00"),
                "line {line:?} should re-split to $1,500.00"
            );
        }
    }

    #[test]
    fn test_render_empty_section_marker() {
        let range = DateRange::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        let document = ReportService::generate_expense_report(&[], range, "Sunrise Farm");

        let artifact = render(&document, &ExportOptions::default()).unwrap();
        let content = String::from_utf8(artifact.bytes).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        let title_index = lines
            .iter()
            .position(|l| *l == "Expense Summary by Category")
            .unwrap();
        assert_eq!(lines[title_index + 1], "No data available");
    }

    #[test]
    fn test_render_rows_without_columns_fails_loudly() {
        use crate::reports::{ReportSection, Row, SectionKind};
        use chrono::Utc;

        let document = ReportDocument {
            title: "Broken".to_string(),
            subtitle: None,
            generated_at: Utc::now(),
            date_range: None,
            summary: vec![],
            sections: vec![ReportSection {
                title: "Orphan Rows".to_string(),
                kind: SectionKind::Table,
                columns: vec![],
                rows: vec![Row::new()],
            }],
        };

        let result = render(&document, &ExportOptions::default());
        assert!(matches!(result, Err(ExportError::MissingColumns(_))));
    }

    #[test]
    fn test_missing_row_key_renders_dash() {
        use crate::reports::{CellFormat, ColumnSpec, ReportSection, Row, SectionKind};
        use chrono::Utc;

        let document = ReportDocument {
            title: "Sparse".to_string(),
            subtitle: None,
            generated_at: Utc::now(),
            date_range: None,
            summary: vec![],
            sections: vec![ReportSection {
                title: "Sparse Rows".to_string(),
                kind: SectionKind::Table,
                columns: vec![
                    ColumnSpec::new("Present", "present", CellFormat::Text),
                    ColumnSpec::new("Absent", "absent", CellFormat::Text),
                ],
                rows: vec![Row::from([(
                    "present".to_string(),
                    crate::reports::CellValue::Text("here".to_string()),
                )])],
            }],
        };

        let artifact = render(&document, &ExportOptions::default()).unwrap();
        let content = String::from_utf8(artifact.bytes).unwrap();
        assert!(content.lines().any(|l| l == "here,-"));
    }
}
