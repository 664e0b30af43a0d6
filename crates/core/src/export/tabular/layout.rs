//! Page layout pass for the tabular exporter.
//!
//! Flows a document top-to-bottom into fixed-size A4 pages. A section that
//! would start below the section threshold breaks to a new page first;
//! tables may split across pages, repeating their header row. Footers are
//! stamped in a second pass once the page count is known.

// Page geometry in millimetres; not monetary math.
#![allow(clippy::float_arithmetic)]

use granary_shared::types::Currency;

use crate::export::error::ExportError;
use crate::export::types::ExportOptions;
use crate::format;
use crate::reports::{ColumnSpec, ReportDocument, ReportSection, Row};

/// Page width in millimetres (A4 portrait).
pub(crate) const PAGE_WIDTH: f64 = 210.0;
/// Page height in millimetres (A4 portrait).
pub(crate) const PAGE_HEIGHT: f64 = 297.0;
/// Outer margin in millimetres.
pub(crate) const MARGIN: f64 = 20.0;
/// Sections never start below this vertical position.
pub(crate) const SECTION_BREAK_THRESHOLD: f64 = 250.0;
/// Table rows never render below this vertical position.
pub(crate) const BODY_LIMIT: f64 = 277.0;

const FOOTER_BASELINE: f64 = 287.0;
const HEADER_BAND_HEIGHT: f64 = 40.0;
const TABLE_HEADER_HEIGHT: f64 = 8.0;
const TABLE_ROW_HEIGHT: f64 = 7.0;

/// Conversion factor from typographic points to millimetres.
const PT_TO_MM: f64 = 25.4 / 72.0;

/// 8-bit RGB fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

const GREEN: Color = Color { r: 34, g: 197, b: 94 };
const WHITE: Color = Color { r: 255, g: 255, b: 255 };
const BLACK: Color = Color { r: 0, g: 0, b: 0 };
const GRAY: Color = Color { r: 100, g: 100, b: 100 };
const LIGHT_GRAY: Color = Color { r: 245, g: 245, b: 245 };
const FOOTER_GRAY: Color = Color { r: 128, g: 128, b: 128 };

/// Helvetica face used for a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontFace {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
    /// Helvetica-Oblique.
    Italic,
}

/// A positioned text run. `y` is the baseline, measured from the page top.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextElement {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub size: f64,
    pub face: FontFace,
    pub color: Color,
}

/// A filled rectangle. `y` is the top edge, measured from the page top.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RectElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

/// One positioned page element.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Element {
    Text(TextElement),
    Rect(RectElement),
}

impl Element {
    /// Lowest vertical extent of this element, from the page top.
    pub(crate) fn bottom(&self) -> f64 {
        match self {
            Self::Text(t) => t.y,
            Self::Rect(r) => r.y + r.height,
        }
    }
}

/// A laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    fn text(&mut self, x: f64, y: f64, text: String, size: f64, face: FontFace, color: Color) {
        self.elements.push(Element::Text(TextElement {
            x,
            y,
            text,
            size,
            face,
            color,
        }));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.elements.push(Element::Rect(RectElement {
            x,
            y,
            width,
            height,
            color,
        }));
    }
}

/// Lays a document out into pages. Footers are not stamped here; run
/// [`stamp_footers`] once the page list is final.
pub(crate) fn layout(
    document: &ReportDocument,
    options: &ExportOptions,
) -> Result<Vec<Page>, ExportError> {
    let mut pages: Vec<Page> = Vec::new();
    let mut page = Page::default();

    // Colored header band with title and subtitle.
    page.rect(0.0, 0.0, PAGE_WIDTH, HEADER_BAND_HEIGHT, GREEN);
    page.text(
        MARGIN,
        25.0,
        document.title.clone(),
        24.0,
        FontFace::Bold,
        WHITE,
    );
    if let Some(subtitle) = &document.subtitle {
        page.text(MARGIN, 35.0, subtitle.clone(), 12.0, FontFace::Regular, WHITE);
    }

    let mut y = 55.0;

    if let Some(range) = &document.date_range {
        let period = format!(
            "Period: {} - {}",
            format::date(range.start),
            format::date(range.end)
        );
        page.text(MARGIN, y, period, 10.0, FontFace::Regular, GRAY);
        y += 10.0;
    }
    let generated = format!("Generated: {}", format::timestamp(document.generated_at));
    page.text(MARGIN, y, generated, 10.0, FontFace::Regular, GRAY);
    y += 15.0;

    if !document.summary.is_empty() {
        page.text(MARGIN, y, "Summary".to_string(), 14.0, FontFace::Bold, BLACK);
        y += 10.0;
        for entry in &document.summary {
            let line = format!(
                "{}: {}",
                entry.label,
                format::summary(&entry.value, options.currency)
            );
            page.text(MARGIN, y, line, 10.0, FontFace::Regular, BLACK);
            y += 7.0;
        }
        y += 10.0;
    }

    for section in &document.sections {
        if y > SECTION_BREAK_THRESHOLD {
            pages.push(std::mem::take(&mut page));
            y = MARGIN;
        }

        page.text(
            MARGIN,
            y,
            section.title.clone(),
            12.0,
            FontFace::Bold,
            BLACK,
        );
        y += 8.0;

        if section.rows.is_empty() {
            page.text(
                MARGIN,
                y,
                "No data available".to_string(),
                10.0,
                FontFace::Italic,
                GRAY,
            );
            y += 15.0;
        } else {
            if section.columns.is_empty() {
                return Err(ExportError::MissingColumns(section.title.clone()));
            }
            y = layout_table(&mut pages, &mut page, y, section, options.currency)?;
            y += 15.0;
        }
    }

    pages.push(page);
    Ok(pages)
}

/// Stamps "Page X of N" and the attribution line on every page. Necessarily
/// a second pass: N is only known once layout has finished.
pub(crate) fn stamp_footers(pages: &mut [Page], attribution: &str) {
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        let label = format!("Page {} of {total}", index + 1);
        let x = (PAGE_WIDTH - approx_text_width(&label, 8.0)) / 2.0;
        page.text(x, FOOTER_BASELINE, label, 8.0, FontFace::Regular, FOOTER_GRAY);
        page.text(
            MARGIN,
            FOOTER_BASELINE,
            attribution.to_string(),
            8.0,
            FontFace::Regular,
            FOOTER_GRAY,
        );
    }
}

fn layout_table(
    pages: &mut Vec<Page>,
    page: &mut Page,
    start_y: f64,
    section: &ReportSection,
    currency: Currency,
) -> Result<f64, ExportError> {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let column_width = usable / section.columns.len() as f64;

    let mut y = start_y;
    table_header(page, y, &section.columns, column_width);
    y += TABLE_HEADER_HEIGHT;

    for (index, row) in section.rows.iter().enumerate() {
        if y + TABLE_ROW_HEIGHT > BODY_LIMIT {
            pages.push(std::mem::take(page));
            y = MARGIN;
            table_header(page, y, &section.columns, column_width);
            y += TABLE_HEADER_HEIGHT;
        }

        if index % 2 == 1 {
            page.rect(MARGIN, y, usable, TABLE_ROW_HEIGHT, LIGHT_GRAY);
        }

        for (col, column) in section.columns.iter().enumerate() {
            let formatted = cell_text(row, column, currency)?;
            page.text(
                MARGIN + col as f64 * column_width + 2.0,
                y + 5.0,
                formatted,
                9.0,
                FontFace::Regular,
                BLACK,
            );
        }
        y += TABLE_ROW_HEIGHT;
    }

    Ok(y)
}

fn table_header(page: &mut Page, y: f64, columns: &[ColumnSpec], column_width: f64) {
    page.rect(
        MARGIN,
        y,
        PAGE_WIDTH - 2.0 * MARGIN,
        TABLE_HEADER_HEIGHT,
        GREEN,
    );
    for (col, column) in columns.iter().enumerate() {
        page.text(
            MARGIN + col as f64 * column_width + 2.0,
            y + 5.5,
            column.header.clone(),
            9.0,
            FontFace::Bold,
            WHITE,
        );
    }
}

fn cell_text(row: &Row, column: &ColumnSpec, currency: Currency) -> Result<String, ExportError> {
    match row.get(&column.key) {
        Some(value) => Ok(format::cell(value, column.format, currency)?),
        None => Ok("-".to_string()),
    }
}

/// Rough Helvetica width estimate for centering (average glyph ~0.5 em).
fn approx_text_width(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * 0.5 * PT_TO_MM
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::records::{ExpenseLineItem, ExpenseRecord};
    use crate::reports::{DateRange, ReportService};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn expense(day: u32, category: &str, total: i64) -> ExpenseRecord {
        ExpenseRecord {
            date: date(2026, 3, day),
            vendor: Some("Vendor".to_string()),
            description: None,
            grand_total: Decimal::from(total),
            line_items: vec![ExpenseLineItem {
                category: category.to_string(),
                line_total: Decimal::from(total),
            }],
        }
    }

    fn sample_document(rows: usize) -> crate::reports::ReportDocument {
        let expenses: Vec<ExpenseRecord> = (0..rows)
            .map(|i| expense(1 + (i % 28) as u32, &format!("Category {i}"), 10))
            .collect();
        let range = DateRange::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        ReportService::generate_expense_report(&expenses, range, "Sunrise Farm")
    }

    #[test]
    fn test_small_report_fits_one_page() {
        let document = sample_document(3);
        let pages = layout(&document, &ExportOptions::default()).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_no_content_below_body_limit() {
        let document = sample_document(120);
        let pages = layout(&document, &ExportOptions::default()).unwrap();

        assert!(pages.len() > 1);
        for page in &pages {
            for element in &page.elements {
                assert!(
                    element.bottom() <= BODY_LIMIT,
                    "element at {} exceeds the safe area",
                    element.bottom()
                );
            }
        }
    }

    #[test]
    fn test_split_table_repeats_header_row() {
        let document = sample_document(120);
        let pages = layout(&document, &ExportOptions::default()).unwrap();

        for page in &pages[1..] {
            let has_header_text = page.elements.iter().any(|e| match e {
                Element::Text(t) => t.face == FontFace::Bold && t.text == "Category",
                Element::Rect(_) => false,
            });
            assert!(has_header_text, "continuation page is missing a table header");
        }
    }

    #[test]
    fn test_section_breaks_before_threshold() {
        // Enough detail rows that the second section would start deep in the
        // page: it must begin on a fresh page instead.
        let document = sample_document(40);
        let pages = layout(&document, &ExportOptions::default()).unwrap();

        for page in &pages {
            for element in &page.elements {
                if let Element::Text(t) = element {
                    if t.text == "Expense Details" {
                        assert!(
                            t.y <= SECTION_BREAK_THRESHOLD,
                            "section title placed at {} after the break threshold",
                            t.y
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_stamp_footers_numbers_every_page() {
        let document = sample_document(120);
        let mut pages = layout(&document, &ExportOptions::default()).unwrap();
        let total = pages.len();
        stamp_footers(&mut pages, "Generated by Granary");

        for (index, page) in pages.iter().enumerate() {
            let marker = format!("Page {} of {total}", index + 1);
            let has_marker = page.elements.iter().any(|e| match e {
                Element::Text(t) => t.text == marker,
                Element::Rect(_) => false,
            });
            let has_attribution = page.elements.iter().any(|e| match e {
                Element::Text(t) => t.text == "Generated by Granary",
                Element::Rect(_) => false,
            });
            assert!(has_marker, "page {} is missing its number", index + 1);
            assert!(has_attribution, "page {} is missing attribution", index + 1);
        }
    }

    #[test]
    fn test_empty_section_renders_placeholder() {
        let document = sample_document(0);
        let pages = layout(&document, &ExportOptions::default()).unwrap();

        let placeholders = pages[0]
            .elements
            .iter()
            .filter(|e| match e {
                Element::Text(t) => t.text == "No data available",
                Element::Rect(_) => false,
            })
            .count();
        assert_eq!(placeholders, 2);
    }
}
