//! Application configuration management.

use serde::Deserialize;
use uuid::Uuid;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    pub ledger: LedgerConfig,
}

/// Ledger configuration.
///
/// Settings the posting core needs wired in from outside: the VAT control
/// account all VAT splits post to, and an optional fixed period that
/// overrides calendar-date resolution for the module.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// The nominal account VAT splits are posted to.
    pub vat_control_account: Uuid,
    /// Fixed period override for the module, if any.
    #[serde(default)]
    pub period_override: Option<Uuid>,
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
            .add_source(config::Environment::with_prefix("LEDGERBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
