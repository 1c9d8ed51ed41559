//! # Application Configuration
//!
//! Loads pricing constants, the database location and the log filter.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOUNCE_DELIVERY_FEE=20.00                                          │
//! │     BOUNCE_TAX_RATE=825                                                │
//! │     BOUNCE_DB_PATH=./bounce.db                                         │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/bounce-checkout/checkout.toml (Linux)                    │
//! │     ~/Library/Application Support/com.bounce.checkout/checkout.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PricingConfig::default(), platform data dir for the database       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [pricing]
//! delivery_fee_cents = 2000
//! tax_rate_bps = 825
//! processing_rate_bps = 300
//! processing_fee_base = "tax_exclusive"
//! service_area_zips = ["78209", "78212"]
//!
//! [database]
//! path = "./bounce.db"
//!
//! [logging]
//! filter = "info,bounce=debug"
//! ```

use bounce_core::{Money, PricingConfig, Rate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Sections
// =============================================================================

/// Where orders and the catalog live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Falls back to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DatabaseSettings {
    /// The configured path, or `<data dir>/bounce.db`, or `./bounce.db`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "bounce", "checkout")
            .map(|dirs| dirs.data_dir().join("bounce.db"))
            .unwrap_or_else(|| PathBuf::from("./bounce.db"))
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| CliError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                config = Self::from_toml(&contents)?;
            } else if explicit {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        self.pricing
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(CliError::Config("database.path cannot be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and skipped.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let money = |key: &str| -> Option<Money> {
            let raw = lookup(key)?;
            match raw.parse::<Money>() {
                Ok(amount) => Some(amount),
                Err(e) => {
                    warn!(key, value = %raw, error = %e, "Ignoring invalid amount in environment");
                    None
                }
            }
        };
        let rate = |key: &str| -> Option<Rate> {
            let raw = lookup(key)?;
            match raw.trim().parse::<u32>() {
                Ok(bps) => Some(Rate::from_bps(bps)),
                Err(_) => {
                    warn!(key, value = %raw, "Ignoring invalid basis points in environment");
                    None
                }
            }
        };

        if let Some(fee) = money("BOUNCE_DELIVERY_FEE") {
            debug!(fee = %fee, "Overriding delivery fee from environment");
            self.pricing.delivery_fee = fee;
        }

        if let Some(tax) = rate("BOUNCE_TAX_RATE") {
            debug!(bps = tax.bps(), "Overriding tax rate from environment");
            self.pricing.tax_rate = tax;
        }

        if let Some(processing) = rate("BOUNCE_PROCESSING_RATE") {
            self.pricing.processing_rate = processing;
        }

        if let Some(fee) = money("BOUNCE_SPECIFIC_TIME_FEE") {
            self.pricing.specific_time_fee = fee;
        }

        if let Some(fee) = money("BOUNCE_OVERNIGHT_FEE") {
            self.pricing.overnight_fee = fee;
        }

        if let Some(path) = lookup("BOUNCE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(zips) = lookup("BOUNCE_SERVICE_ZIPS") {
            self.pricing.service_area_zips = zips
                .split(',')
                .map(str::trim)
                .filter(|zip| !zip.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bounce", "checkout")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounce_core::{CheckoutStep, ProcessingFeeBase};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.tax_rate.bps(), 825);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_toml_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [pricing]
            delivery_fee_cents = 2000
            processing_fee_base = "tax_exclusive"
            steps = ["selection", "datetime", "details", "extras", "review"]

            [database]
            path = "/tmp/bounce-test.db"

            [logging]
            filter = "warn"
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.delivery_fee, Money::from_dollars(20));
        assert_eq!(config.pricing.processing_fee_base, ProcessingFeeBase::TaxExclusive);
        assert_eq!(config.pricing.steps.first(), Some(CheckoutStep::Selection));
        // untouched keys keep their defaults
        assert_eq!(config.pricing.max_rental_items, 3);
        assert_eq!(config.database.resolved_path(), PathBuf::from("/tmp/bounce-test.db"));
        assert_eq!(config.logging.filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup_from(&[
            ("BOUNCE_DELIVERY_FEE", "$20.00"),
            ("BOUNCE_TAX_RATE", "700"),
            ("BOUNCE_SPECIFIC_TIME_FEE", "20"),
            ("BOUNCE_DB_PATH", "./orders.db"),
            ("BOUNCE_SERVICE_ZIPS", "78701, 78702,,"),
        ]));

        assert_eq!(config.pricing.delivery_fee, Money::from_cents(2000));
        assert_eq!(config.pricing.tax_rate.bps(), 700);
        assert_eq!(config.pricing.specific_time_fee, Money::from_dollars(20));
        assert_eq!(config.database.path, Some(PathBuf::from("./orders.db")));
        assert_eq!(config.pricing.service_area_zips, vec!["78701", "78702"]);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup_from(&[
            ("BOUNCE_DELIVERY_FEE", "twenty"),
            ("BOUNCE_PROCESSING_RATE", "3%"),
        ]));

        assert_eq!(config.pricing.delivery_fee, Money::zero());
        assert_eq!(config.pricing.processing_rate.bps(), 300);
    }

    #[test]
    fn test_validation_rejects_bad_pricing() {
        let mut config = AppConfig::default();
        config.pricing.tax_rate = Rate::from_bps(20_000);
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("bounce-checkout-{}.toml", std::process::id()));
        std::fs::write(&path, "[pricing]\ndelivery_fee_cents = \"twenty\"\n").unwrap();

        assert!(matches!(AppConfig::load(Some(path.clone())), Err(CliError::Toml(_))));
        let config = AppConfig::load_or_default(Some(path.clone()));
        assert_eq!(config.pricing, PricingConfig::default());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(PathBuf::from("/nonexistent/checkout.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
