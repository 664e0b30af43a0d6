//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Report generation configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Export rendering configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Report generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// ISO 4217 code of the reporting currency.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Export rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Attribution line stamped on every exported page.
    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            attribution: default_attribution(),
        }
    }
}

fn default_attribution() -> String {
    "Generated by Granary".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GRANARY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
