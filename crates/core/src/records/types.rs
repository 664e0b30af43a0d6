//! Input record types supplied by the record source.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line of an expense, attributed to its own category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLineItem {
    /// Expense category this line belongs to.
    pub category: String,
    /// Line amount.
    #[serde(default)]
    pub line_total: Decimal,
}

/// An expense transaction, optionally broken into line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Transaction date.
    pub date: NaiveDate,
    /// Vendor display name.
    #[serde(default)]
    pub vendor: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Total amount of the whole transaction.
    #[serde(default)]
    pub grand_total: Decimal,
    /// Nested line items; may be empty.
    #[serde(default)]
    pub line_items: Vec<ExpenseLineItem>,
}

/// An income entry (a sale of farm produce or livestock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// Sale date.
    pub date: NaiveDate,
    /// Item sold.
    pub item: String,
    /// Quantity sold.
    #[serde(default)]
    pub quantity: Decimal,
    /// Unit price.
    #[serde(default)]
    pub price: Decimal,
    /// Total amount of the sale.
    #[serde(default)]
    pub amount: Decimal,
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// Not yet sent to the customer.
    #[default]
    Draft,
    /// Sent, awaiting payment.
    Sent,
    /// Payment received.
    Paid,
    /// Past its due date without payment.
    Overdue,
    /// Voided.
    Cancelled,
}

impl InvoiceStatus {
    /// Wire string used by the record source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse from the record source's wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "SENT" => Some(Self::Sent),
            "PAID" => Some(Self::Paid),
            "OVERDUE" => Some(Self::Overdue),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Human-readable invoice number.
    pub invoice_number: String,
    /// Customer display name.
    #[serde(default)]
    pub customer: Option<String>,
    /// Issue date.
    pub date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Current status.
    pub status: InvoiceStatus,
    /// Invoice total.
    #[serde(default)]
    pub total: Decimal,
}

/// A current inventory snapshot entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Item name.
    pub name: String,
    /// Item classification (seed, feed, equipment, ...).
    #[serde(rename = "type")]
    pub item_type: String,
    /// Quantity on hand.
    #[serde(default)]
    pub quantity: Decimal,
    /// Unit of measure.
    #[serde(default)]
    pub unit: Option<String>,
    /// Cost per unit.
    #[serde(default)]
    pub cost: Decimal,
    /// Storage location.
    #[serde(default)]
    pub location: Option<String>,
}

/// A livestock snapshot entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivestockRecord {
    /// Animal name or tag.
    pub name: String,
    /// Species.
    pub species: String,
    /// Breed, when recorded.
    #[serde(default)]
    pub breed: Option<String>,
    /// Husbandry status (active, sold, ...).
    pub status: String,
    /// Acquisition cost, used as the animal's book value.
    #[serde(default)]
    pub acquisition_cost: Decimal,
}
