//! Calendar quarter management for tax reporting.

pub mod quarter;

pub use quarter::Quarter;
