//! Export configuration types.

use std::str::FromStr;

use granary_shared::types::Currency;
use granary_shared::{AppConfig, AppError};

/// Rendering options shared by both exporters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Reporting currency for monetary cells.
    pub currency: Currency,
    /// Attribution line stamped on every exported page.
    pub attribution: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            attribution: "Generated by Granary".to_string(),
        }
    }
}

impl ExportOptions {
    /// Builds export options from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the configured currency code is
    /// unknown.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let currency =
            Currency::from_str(&config.report.currency).map_err(AppError::Configuration)?;
        Ok(Self {
            currency,
            attribution: config.export.attribution.clone(),
        })
    }
}
