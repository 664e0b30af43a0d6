//! Raw transactional record shapes.
//!
//! These are the collections the surrounding application fetches and hands
//! to the report service, already filtered to the requested window. The
//! engine performs no validation beyond treating missing numeric fields as
//! zero.

pub mod types;

pub use types::{
    ExpenseLineItem, ExpenseRecord, IncomeRecord, InventoryItem, InvoiceRecord, InvoiceStatus,
    LivestockRecord,
};
