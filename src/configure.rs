use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::transfer::types::Settings;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub log_to_file: bool,
    pub log_file: String,
    pub storage_path: String,
    pub initial_balance: u64,
    pub daily_limit: u64,
    pub upfront_checks: bool,
    /// Probability that a verified transfer settles. 1.0 means always.
    pub settlement_success_rate: f64,
}

impl AppConfig {
    /// Defaults used when nothing has been saved to storage yet
    pub fn default_settings(&self) -> Settings {
        Settings {
            balance: self.initial_balance,
            daily_limit: self.daily_limit,
            upfront_checks: self.upfront_checks,
        }
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let s = Config::builder()
        // Set defaults
        .set_default("log_level", "info")?
        .set_default("log_to_file", false)?
        .set_default("log_file", "log/transfer_otp.log")?
        .set_default("storage_path", "data/transfer_settings")?
        .set_default("initial_balance", 100_000_000_u64)?
        .set_default("daily_limit", 100_000_000_u64)?
        .set_default("upfront_checks", false)?
        .set_default("settlement_success_rate", 1.0)?
        // Add configuration from a file
        .add_source(File::with_name("config/config.yaml").required(false))
        // Add configuration from environment variables
        .add_source(config::Environment::with_prefix("APP"))
        .build()?;

    s.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_from_config() {
        let cfg = AppConfig {
            log_level: "debug".to_string(),
            log_to_file: false,
            log_file: "log/test.log".to_string(),
            storage_path: "data/test".to_string(),
            initial_balance: 1_000_000,
            daily_limit: 5_000_000,
            upfront_checks: true,
            settlement_success_rate: 1.0,
        };

        let settings = cfg.default_settings();
        assert_eq!(settings.balance, 1_000_000);
        assert_eq!(settings.daily_limit, 5_000_000);
        assert!(settings.upfront_checks);
    }
}
