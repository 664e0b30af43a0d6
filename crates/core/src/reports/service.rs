//! Report generation service.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{
    CellFormat, CellValue, ColumnSpec, DateRange, ReportDocument, ReportSection, Row, SectionKind,
    SummaryEntry,
};
use crate::fiscal::Quarter;
use crate::records::{
    ExpenseRecord, IncomeRecord, InventoryItem, InvoiceRecord, InvoiceStatus, LivestockRecord,
};

/// Service for generating farm reports.
///
/// Every generator is a pure function over pre-filtered record collections:
/// filtering to the requested window is the caller's responsibility, and the
/// service only groups and totals. Empty input is an expected state, not an
/// error; every generator returns a well-formed document with zero-valued
/// summaries and empty sections.
pub struct ReportService;

impl ReportService {
    /// Generates an expense report grouped by line-item category.
    ///
    /// Each line item contributes to its own category; a record without line
    /// items falls back to a single "Uncategorized" bucket with the record's
    /// grand total.
    #[must_use]
    pub fn generate_expense_report(
        expenses: &[ExpenseRecord],
        date_range: DateRange,
        farm_name: &str,
    ) -> ReportDocument {
        let total_expenses: Decimal = expenses.iter().map(|e| e.grand_total).sum();

        let mut categories = expense_categories(expenses, "Uncategorized");
        categories.sort_by(|a, b| b.1.cmp(&a.1));

        let category_rows: Vec<Row> = categories
            .iter()
            .map(|(category, amount)| {
                Row::from([
                    ("category".to_string(), CellValue::Text(category.clone())),
                    ("amount".to_string(), CellValue::Amount(*amount)),
                    (
                        "percentage".to_string(),
                        CellValue::Text(percentage_text(*amount, total_expenses)),
                    ),
                ])
            })
            .collect();

        let detail_rows: Vec<Row> = expenses
            .iter()
            .map(|expense| {
                Row::from([
                    ("date".to_string(), CellValue::Date(expense.date)),
                    ("vendor".to_string(), text_or_na(expense.vendor.as_deref())),
                    (
                        "description".to_string(),
                        text_or_na(expense.description.as_deref()),
                    ),
                    ("amount".to_string(), CellValue::Amount(expense.grand_total)),
                ])
            })
            .collect();

        let document = ReportDocument {
            title: "Expense Report".to_string(),
            subtitle: Some(farm_name.to_string()),
            generated_at: Utc::now(),
            date_range: Some(date_range),
            summary: vec![
                SummaryEntry::amount("Total Expenses", total_expenses),
                SummaryEntry::count("Number of Transactions", expenses.len()),
                SummaryEntry::amount("Average Expense", average(total_expenses, expenses.len())),
            ],
            sections: vec![
                ReportSection {
                    title: "Expense Summary by Category".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Category", "category", CellFormat::Text),
                        ColumnSpec::new("Amount", "amount", CellFormat::Currency),
                        ColumnSpec::new("% of Total", "percentage", CellFormat::Text),
                    ],
                    rows: category_rows,
                },
                ReportSection {
                    title: "Expense Details".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Date", "date", CellFormat::Date),
                        ColumnSpec::new("Vendor", "vendor", CellFormat::Text),
                        ColumnSpec::new("Description", "description", CellFormat::Text),
                        ColumnSpec::new("Amount", "amount", CellFormat::Currency),
                    ],
                    rows: detail_rows,
                },
            ],
        };

        debug!(records = expenses.len(), "generated expense report");
        document
    }

    /// Generates an income report grouped by item sold.
    #[must_use]
    pub fn generate_income_report(
        income: &[IncomeRecord],
        date_range: DateRange,
        farm_name: &str,
    ) -> ReportDocument {
        let total_income: Decimal = income.iter().map(|i| i.amount).sum();

        let mut items = income_by_item(income);
        items.sort_by(|a, b| b.1.amount.cmp(&a.1.amount));

        let item_rows: Vec<Row> = items
            .iter()
            .map(|(item, totals)| {
                Row::from([
                    ("item".to_string(), CellValue::Text(item.clone())),
                    ("quantity".to_string(), CellValue::Number(totals.quantity)),
                    ("amount".to_string(), CellValue::Amount(totals.amount)),
                    (
                        "percentage".to_string(),
                        CellValue::Text(percentage_text(totals.amount, total_income)),
                    ),
                ])
            })
            .collect();

        let detail_rows: Vec<Row> = income
            .iter()
            .map(|sale| {
                Row::from([
                    ("date".to_string(), CellValue::Date(sale.date)),
                    ("item".to_string(), CellValue::Text(sale.item.clone())),
                    ("quantity".to_string(), CellValue::Number(sale.quantity)),
                    ("price".to_string(), CellValue::Amount(sale.price)),
                    ("amount".to_string(), CellValue::Amount(sale.amount)),
                ])
            })
            .collect();

        let document = ReportDocument {
            title: "Income Report".to_string(),
            subtitle: Some(farm_name.to_string()),
            generated_at: Utc::now(),
            date_range: Some(date_range),
            summary: vec![
                SummaryEntry::amount("Total Income", total_income),
                SummaryEntry::count("Number of Sales", income.len()),
                SummaryEntry::amount("Average Sale", average(total_income, income.len())),
            ],
            sections: vec![
                ReportSection {
                    title: "Income by Item Type".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Item", "item", CellFormat::Text),
                        ColumnSpec::new("Quantity", "quantity", CellFormat::Number),
                        ColumnSpec::new("Amount", "amount", CellFormat::Currency),
                        ColumnSpec::new("% of Total", "percentage", CellFormat::Text),
                    ],
                    rows: item_rows,
                },
                ReportSection {
                    title: "Income Details".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Date", "date", CellFormat::Date),
                        ColumnSpec::new("Item", "item", CellFormat::Text),
                        ColumnSpec::new("Qty", "quantity", CellFormat::Number),
                        ColumnSpec::new("Unit Price", "price", CellFormat::Currency),
                        ColumnSpec::new("Total", "amount", CellFormat::Currency),
                    ],
                    rows: detail_rows,
                },
            ],
        };

        debug!(records = income.len(), "generated income report");
        document
    }

    /// Generates a profit & loss statement from income and expense records.
    #[must_use]
    pub fn generate_profit_loss_report(
        income: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        date_range: DateRange,
        farm_name: &str,
    ) -> ReportDocument {
        let total_revenue: Decimal = income.iter().map(|i| i.amount).sum();
        let total_expenses: Decimal = expenses.iter().map(|e| e.grand_total).sum();
        let net_profit = total_revenue - total_expenses;

        let revenue_rows: Vec<Row> = income_by_item(income)
            .iter()
            .map(|(item, totals)| description_amount_row(item, totals.amount))
            .collect();

        let expense_rows: Vec<Row> = expense_categories(expenses, "Uncategorized")
            .iter()
            .map(|(category, amount)| description_amount_row(category, *amount))
            .collect();

        let document = ReportDocument {
            title: "Profit & Loss Statement".to_string(),
            subtitle: Some(farm_name.to_string()),
            generated_at: Utc::now(),
            date_range: Some(date_range),
            summary: vec![
                SummaryEntry::amount("Total Revenue", total_revenue),
                SummaryEntry::amount("Total Expenses", total_expenses),
                SummaryEntry::amount("Net Profit/Loss", net_profit),
                SummaryEntry::text("Profit Margin", margin_text(net_profit, total_revenue)),
            ],
            sections: vec![
                ReportSection {
                    title: "Revenue".to_string(),
                    kind: SectionKind::Table,
                    columns: description_amount_columns(),
                    rows: revenue_rows,
                },
                ReportSection {
                    title: "Expenses".to_string(),
                    kind: SectionKind::Table,
                    columns: description_amount_columns(),
                    rows: expense_rows,
                },
            ],
        };

        debug!(
            income = income.len(),
            expenses = expenses.len(),
            "generated profit & loss statement"
        );
        document
    }

    /// Generates a point-in-time inventory report.
    ///
    /// Item value is `quantity * cost`; livestock value is the acquisition
    /// cost. There is no date range: the report describes the current
    /// snapshot.
    #[must_use]
    pub fn generate_inventory_report(
        items: &[InventoryItem],
        livestock: &[LivestockRecord],
        farm_name: &str,
    ) -> ReportDocument {
        let inventory_value: Decimal = items.iter().map(|i| i.quantity * i.cost).sum();
        let livestock_value: Decimal = livestock.iter().map(|a| a.acquisition_cost).sum();

        let item_rows: Vec<Row> = items
            .iter()
            .map(|item| {
                Row::from([
                    ("name".to_string(), CellValue::Text(item.name.clone())),
                    ("type".to_string(), CellValue::Text(item.item_type.clone())),
                    ("quantity".to_string(), CellValue::Number(item.quantity)),
                    (
                        "unit".to_string(),
                        CellValue::Text(
                            item.unit.clone().unwrap_or_else(|| "units".to_string()),
                        ),
                    ),
                    ("cost".to_string(), CellValue::Amount(item.cost)),
                    (
                        "value".to_string(),
                        CellValue::Amount(item.quantity * item.cost),
                    ),
                    ("location".to_string(), text_or_na(item.location.as_deref())),
                ])
            })
            .collect();

        let livestock_rows: Vec<Row> = livestock
            .iter()
            .map(|animal| {
                Row::from([
                    ("name".to_string(), CellValue::Text(animal.name.clone())),
                    (
                        "species".to_string(),
                        CellValue::Text(animal.species.clone()),
                    ),
                    ("breed".to_string(), text_or_na(animal.breed.as_deref())),
                    ("status".to_string(), CellValue::Text(animal.status.clone())),
                    (
                        "acquisition_cost".to_string(),
                        CellValue::Amount(animal.acquisition_cost),
                    ),
                ])
            })
            .collect();

        let document = ReportDocument {
            title: "Inventory Report".to_string(),
            subtitle: Some(farm_name.to_string()),
            generated_at: Utc::now(),
            date_range: None,
            summary: vec![
                SummaryEntry::count("Total Inventory Items", items.len()),
                SummaryEntry::amount("Inventory Value", inventory_value),
                SummaryEntry::count("Total Livestock", livestock.len()),
                SummaryEntry::amount("Livestock Value", livestock_value),
                SummaryEntry::amount("Total Assets Value", inventory_value + livestock_value),
            ],
            sections: vec![
                ReportSection {
                    title: "Inventory Items".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Item", "name", CellFormat::Text),
                        ColumnSpec::new("Type", "type", CellFormat::Text),
                        ColumnSpec::new("Qty", "quantity", CellFormat::Number),
                        ColumnSpec::new("Unit", "unit", CellFormat::Text),
                        ColumnSpec::new("Unit Cost", "cost", CellFormat::Currency),
                        ColumnSpec::new("Value", "value", CellFormat::Currency),
                    ],
                    rows: item_rows,
                },
                ReportSection {
                    title: "Livestock".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Name", "name", CellFormat::Text),
                        ColumnSpec::new("Species", "species", CellFormat::Text),
                        ColumnSpec::new("Breed", "breed", CellFormat::Text),
                        ColumnSpec::new("Status", "status", CellFormat::Text),
                        ColumnSpec::new("Value", "acquisition_cost", CellFormat::Currency),
                    ],
                    rows: livestock_rows,
                },
            ],
        };

        debug!(
            items = items.len(),
            livestock = livestock.len(),
            "generated inventory report"
        );
        document
    }

    /// Generates an invoice summary grouped by status.
    #[must_use]
    pub fn generate_invoice_summary(
        invoices: &[InvoiceRecord],
        date_range: DateRange,
        farm_name: &str,
    ) -> ReportDocument {
        let total_invoiced: Decimal = invoices.iter().map(|i| i.total).sum();
        let total_paid: Decimal = invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Paid)
            .map(|i| i.total)
            .sum();
        let total_overdue: Decimal = invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Overdue)
            .map(|i| i.total)
            .sum();

        let status_rows: Vec<Row> = invoices_by_status(invoices)
            .iter()
            .map(|(status, totals)| {
                Row::from([
                    (
                        "status".to_string(),
                        CellValue::Text(status.as_str().to_string()),
                    ),
                    (
                        "count".to_string(),
                        CellValue::Number(Decimal::from(totals.count)),
                    ),
                    ("amount".to_string(), CellValue::Amount(totals.amount)),
                ])
            })
            .collect();

        let detail_rows: Vec<Row> = invoices
            .iter()
            .map(|invoice| {
                Row::from([
                    (
                        "invoice_number".to_string(),
                        CellValue::Text(invoice.invoice_number.clone()),
                    ),
                    (
                        "customer".to_string(),
                        text_or_na(invoice.customer.as_deref()),
                    ),
                    ("date".to_string(), CellValue::Date(invoice.date)),
                    ("due_date".to_string(), CellValue::Date(invoice.due_date)),
                    (
                        "status".to_string(),
                        CellValue::Text(invoice.status.as_str().to_string()),
                    ),
                    ("total".to_string(), CellValue::Amount(invoice.total)),
                ])
            })
            .collect();

        let document = ReportDocument {
            title: "Invoice Summary".to_string(),
            subtitle: Some(farm_name.to_string()),
            generated_at: Utc::now(),
            date_range: Some(date_range),
            summary: vec![
                SummaryEntry::amount("Total Invoiced", total_invoiced),
                SummaryEntry::amount("Total Paid", total_paid),
                SummaryEntry::amount("Total Outstanding", total_invoiced - total_paid),
                SummaryEntry::amount("Overdue Amount", total_overdue),
                SummaryEntry::count("Number of Invoices", invoices.len()),
            ],
            sections: vec![
                ReportSection {
                    title: "Invoices by Status".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Status", "status", CellFormat::Text),
                        ColumnSpec::new("Count", "count", CellFormat::Number),
                        ColumnSpec::new("Amount", "amount", CellFormat::Currency),
                    ],
                    rows: status_rows,
                },
                ReportSection {
                    title: "Invoice Details".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Invoice #", "invoice_number", CellFormat::Text),
                        ColumnSpec::new("Customer", "customer", CellFormat::Text),
                        ColumnSpec::new("Date", "date", CellFormat::Date),
                        ColumnSpec::new("Due Date", "due_date", CellFormat::Date),
                        ColumnSpec::new("Status", "status", CellFormat::Text),
                        ColumnSpec::new("Total", "total", CellFormat::Currency),
                    ],
                    rows: detail_rows,
                },
            ],
        };

        debug!(records = invoices.len(), "generated invoice summary");
        document
    }

    /// Generates a tax summary for a calendar year.
    ///
    /// Income and expenses are bucketed into the four calendar quarters by
    /// record month; records outside the tax year are excluded by the
    /// caller, not here. Expense records without line items fall back to an
    /// "Other Business Expenses" deduction bucket.
    #[must_use]
    pub fn generate_tax_summary(
        income: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        tax_year: i32,
        farm_name: &str,
    ) -> ReportDocument {
        let gross_income: Decimal = income.iter().map(|i| i.amount).sum();
        let total_deductions: Decimal = expenses.iter().map(|e| e.grand_total).sum();
        let net_income = gross_income - total_deductions;

        // With no records at all the quarterly table stays empty; the four
        // fixed buckets only materialize once there is data to bucket.
        let quarterly_rows: Vec<Row> = if income.is_empty() && expenses.is_empty() {
            Vec::new()
        } else {
            Quarter::ALL
                .iter()
                .map(|quarter| {
                    let quarter_income: Decimal = income
                        .iter()
                        .filter(|i| quarter.contains_date(i.date))
                        .map(|i| i.amount)
                        .sum();
                    let quarter_expenses: Decimal = expenses
                        .iter()
                        .filter(|e| quarter.contains_date(e.date))
                        .map(|e| e.grand_total)
                        .sum();

                    Row::from([
                        (
                            "quarter".to_string(),
                            CellValue::Text(quarter.label(tax_year)),
                        ),
                        ("income".to_string(), CellValue::Amount(quarter_income)),
                        ("expenses".to_string(), CellValue::Amount(quarter_expenses)),
                        (
                            "net_income".to_string(),
                            CellValue::Amount(quarter_income - quarter_expenses),
                        ),
                    ])
                })
                .collect()
        };

        let mut deductions = expense_categories(expenses, "Other Business Expenses");
        deductions.sort_by(|a, b| b.1.cmp(&a.1));

        let deduction_rows: Vec<Row> = deductions
            .iter()
            .map(|(category, amount)| {
                Row::from([
                    ("category".to_string(), CellValue::Text(category.clone())),
                    ("amount".to_string(), CellValue::Amount(*amount)),
                ])
            })
            .collect();

        let document = ReportDocument {
            title: "Tax Summary".to_string(),
            subtitle: Some(format!("{farm_name} - Tax Year {tax_year}")),
            generated_at: Utc::now(),
            date_range: None,
            summary: vec![
                SummaryEntry::amount("Gross Income", gross_income),
                SummaryEntry::amount("Total Deductions", total_deductions),
                SummaryEntry::amount("Net Income", net_income),
                SummaryEntry::text("Tax Year", tax_year.to_string()),
            ],
            sections: vec![
                ReportSection {
                    title: "Quarterly Summary".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Quarter", "quarter", CellFormat::Text),
                        ColumnSpec::new("Income", "income", CellFormat::Currency),
                        ColumnSpec::new("Expenses", "expenses", CellFormat::Currency),
                        ColumnSpec::new("Net Income", "net_income", CellFormat::Currency),
                    ],
                    rows: quarterly_rows,
                },
                ReportSection {
                    title: "Deductible Expenses by Category".to_string(),
                    kind: SectionKind::Table,
                    columns: vec![
                        ColumnSpec::new("Category", "category", CellFormat::Text),
                        ColumnSpec::new("Amount", "amount", CellFormat::Currency),
                    ],
                    rows: deduction_rows,
                },
            ],
        };

        debug!(
            income = income.len(),
            expenses = expenses.len(),
            tax_year,
            "generated tax summary"
        );
        document
    }
}

/// Accumulated totals for one income item.
#[derive(Debug, Clone, Copy, Default)]
struct ItemTotals {
    amount: Decimal,
    quantity: Decimal,
}

/// Accumulated totals for one invoice status.
#[derive(Debug, Clone, Copy, Default)]
struct StatusTotals {
    count: u64,
    amount: Decimal,
}

/// Groups expense amounts by line-item category, preserving first-seen
/// order. Records without line items contribute their grand total to the
/// fallback bucket.
fn expense_categories(expenses: &[ExpenseRecord], fallback: &str) -> Vec<(String, Decimal)> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for expense in expenses {
        if expense.line_items.is_empty() {
            accumulate(&mut groups, fallback, expense.grand_total);
        } else {
            for line in &expense.line_items {
                accumulate(&mut groups, &line.category, line.line_total);
            }
        }
    }
    groups
}

/// Groups income amounts and quantities by item, preserving first-seen order.
fn income_by_item(income: &[IncomeRecord]) -> Vec<(String, ItemTotals)> {
    let mut groups: Vec<(String, ItemTotals)> = Vec::new();
    for sale in income {
        if let Some((_, totals)) = groups.iter_mut().find(|(item, _)| *item == sale.item) {
            totals.amount += sale.amount;
            totals.quantity += sale.quantity;
        } else {
            groups.push((
                sale.item.clone(),
                ItemTotals {
                    amount: sale.amount,
                    quantity: sale.quantity,
                },
            ));
        }
    }
    groups
}

/// Groups invoice counts and amounts by status, preserving first-seen order.
fn invoices_by_status(invoices: &[InvoiceRecord]) -> Vec<(InvoiceStatus, StatusTotals)> {
    let mut groups: Vec<(InvoiceStatus, StatusTotals)> = Vec::new();
    for invoice in invoices {
        if let Some((_, totals)) = groups.iter_mut().find(|(status, _)| *status == invoice.status) {
            totals.count += 1;
            totals.amount += invoice.total;
        } else {
            groups.push((
                invoice.status,
                StatusTotals {
                    count: 1,
                    amount: invoice.total,
                },
            ));
        }
    }
    groups
}

fn accumulate(groups: &mut Vec<(String, Decimal)>, key: &str, amount: Decimal) {
    if let Some((_, total)) = groups.iter_mut().find(|(k, _)| k.as_str() == key) {
        *total += amount;
    } else {
        groups.push((key.to_string(), amount));
    }
}

/// Share of `amount` in `total` as a one-decimal percentage string, or "0%"
/// when there is no total to divide by.
fn percentage_text(amount: Decimal, total: Decimal) -> String {
    if total > Decimal::ZERO {
        let pct = (amount / total * Decimal::ONE_HUNDRED).round_dp(1);
        format!("{pct:.1}%")
    } else {
        "0%".to_string()
    }
}

/// Profit margin as a one-decimal percentage string; zero when there is no
/// revenue.
fn margin_text(net_profit: Decimal, total_revenue: Decimal) -> String {
    let margin = if total_revenue > Decimal::ZERO {
        (net_profit / total_revenue * Decimal::ONE_HUNDRED).round_dp(1)
    } else {
        Decimal::ZERO
    };
    format!("{margin:.1}%")
}

/// Average of a total over a record count; zero when there are no records.
fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

fn text_or_na(value: Option<&str>) -> CellValue {
    CellValue::Text(value.unwrap_or("N/A").to_string())
}

fn description_amount_row(description: &str, amount: Decimal) -> Row {
    Row::from([
        (
            "description".to_string(),
            CellValue::Text(description.to_string()),
        ),
        ("amount".to_string(), CellValue::Amount(amount)),
    ])
}

fn description_amount_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Description", "description", CellFormat::Text),
        ColumnSpec::new("Amount", "amount", CellFormat::Currency),
    ]
}
