//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Approval policies preloaded onto the engine at startup.
    #[serde(default)]
    pub approvals: Vec<ApprovalPolicyConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Tracing filter directive, e.g. `balanza_core=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "balanza_core=debug".to_string()
}

/// An approval threshold for a single GL control account.
///
/// Sub-ledger transactions against `gl_account` with an absolute amount at
/// or above `min_amount` must carry an approver identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalPolicyConfig {
    /// The GL control account code the policy applies to.
    pub gl_account: String,
    /// Minimum absolute amount that triggers the approval requirement.
    pub min_amount: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BALANZA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
