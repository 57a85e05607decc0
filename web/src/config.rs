//! Configuration management for the booking server.
//!
//! Loads configuration from environment variables with sensible defaults.

use chrono::TimeDelta;
use guesthouse_core::{Money, PricingPolicy, TaxRate};
use guesthouse_runtime::{BookingConfig, StayPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration values that are present but unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// `PostgreSQL` configuration; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,
    /// Booking policy
    pub booking: BookingSettings,
    /// Expose `/metrics`
    pub metrics_enabled: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// `PostgreSQL` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// Booking policy settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookingSettings {
    /// Quote time-to-live in seconds
    pub quote_ttl_seconds: i64,
    /// Expired-quote sweep interval in seconds
    pub reaper_interval_seconds: u64,
    /// Tax rate in basis points (`1200` = 12%)
    pub tax_rate_basis_points: u32,
    /// Flat service charge in minor units
    pub service_charge_minor: u64,
    /// Handling of non-positive stays
    pub stay_policy: StayPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Unset or unparsable optional numeric variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a `STAY_POLICY` other than `clamp` or `reject`,
    /// or a `QUOTE_TTL_SECONDS` that is not a whole number of seconds between 1 and
    /// [`BookingConfig::MAX_QUOTE_TTL_SECONDS`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let stay_policy = match lookup("STAY_POLICY") {
            Some(value) => value.parse().map_err(|e: guesthouse_core::BookingError| {
                ConfigError::Invalid {
                    name: "STAY_POLICY",
                    value,
                    reason: e.to_string(),
                }
            })?,
            None => StayPolicy::default(),
        };

        let quote_ttl_seconds = match lookup("QUOTE_TTL_SECONDS") {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(ttl) if (1..=BookingConfig::MAX_QUOTE_TTL_SECONDS).contains(&ttl) => ttl,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "QUOTE_TTL_SECONDS",
                        value,
                        reason: format!(
                            "expected seconds between 1 and {}",
                            BookingConfig::MAX_QUOTE_TTL_SECONDS
                        ),
                    });
                }
            },
            None => BookingConfig::DEFAULT_QUOTE_TTL_SECONDS,
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed(&lookup, "PORT").unwrap_or(10000),
            },
            database: lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .map(|url| DatabaseConfig {
                    url,
                    max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS").unwrap_or(10),
                }),
            booking: BookingSettings {
                quote_ttl_seconds,
                reaper_interval_seconds: parsed::<u64>(&lookup, "QUOTE_REAPER_INTERVAL_SECONDS")
                    .filter(|interval| *interval > 0)
                    .unwrap_or(BookingConfig::DEFAULT_REAPER_INTERVAL_SECONDS),
                tax_rate_basis_points: parsed(&lookup, "TAX_RATE_BASIS_POINTS")
                    .unwrap_or(TaxRate::STANDARD.basis_points()),
                service_charge_minor: parsed(&lookup, "SERVICE_CHARGE_MINOR")
                    .unwrap_or(PricingPolicy::STANDARD_SURCHARGE.minor()),
                stay_policy,
            },
            metrics_enabled: parsed(&lookup, "METRICS_ENABLED").unwrap_or(true),
        })
    }

    /// Socket address string for the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|value| value.trim().parse().ok())
}

impl BookingSettings {
    /// Runtime booking configuration for these settings.
    ///
    /// The quote TTL is clamped to `1..=`[`BookingConfig::MAX_QUOTE_TTL_SECONDS`].
    #[must_use]
    pub fn booking_config(&self) -> BookingConfig {
        let ttl = self
            .quote_ttl_seconds
            .clamp(1, BookingConfig::MAX_QUOTE_TTL_SECONDS);
        BookingConfig {
            quote_ttl: TimeDelta::seconds(ttl),
            reaper_interval: Duration::from_secs(self.reaper_interval_seconds),
            pricing: PricingPolicy::new(
                TaxRate::from_basis_points(self.tax_rate_basis_points),
                Money::from_minor(self.service_charge_minor),
            ),
            stay_policy: self.stay_policy,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:10000");
        assert!(config.database.is_none());
        assert!(config.metrics_enabled);
        assert_eq!(config.booking.booking_config(), BookingConfig::default());
    }

    #[test]
    fn test_variables_map_to_settings() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/guesthouse"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("QUOTE_TTL_SECONDS", "300"),
            ("QUOTE_REAPER_INTERVAL_SECONDS", "15"),
            ("TAX_RATE_BASIS_POINTS", "1800"),
            ("SERVICE_CHARGE_MINOR", "2500"),
            ("STAY_POLICY", "Reject"),
            ("METRICS_ENABLED", "false"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://localhost/guesthouse");
        assert_eq!(database.max_connections, 4);
        assert_eq!(config.booking.quote_ttl_seconds, 300);
        assert_eq!(config.booking.reaper_interval_seconds, 15);
        assert_eq!(config.booking.tax_rate_basis_points, 1800);
        assert_eq!(config.booking.service_charge_minor, 2500);
        assert_eq!(config.booking.stay_policy, StayPolicy::Reject);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_blank_database_url_selects_memory_store() {
        assert!(load(&[("DATABASE_URL", "  ")]).unwrap().database.is_none());
    }

    #[test]
    fn test_unknown_stay_policy_is_rejected() {
        let err = load(&[("STAY_POLICY", "strict")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "STAY_POLICY", ref value, .. } if value == "strict"
        ));
    }

    #[test]
    fn test_quote_ttl_out_of_range_is_rejected() {
        for value in ["0", "-5", "soon", "604801", "10000000000000"] {
            let err = load(&[("QUOTE_TTL_SECONDS", value)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "QUOTE_TTL_SECONDS", .. }),
                "{value}"
            );
        }
        assert_eq!(
            load(&[("QUOTE_TTL_SECONDS", "604800")]).unwrap().booking.quote_ttl_seconds,
            BookingConfig::MAX_QUOTE_TTL_SECONDS
        );
    }

    #[test]
    fn test_booking_config_clamps_oversized_ttl() {
        let settings = BookingSettings {
            quote_ttl_seconds: i64::MAX,
            reaper_interval_seconds: 60,
            tax_rate_basis_points: 1200,
            service_charge_minor: 5000,
            stay_policy: StayPolicy::Clamp,
        };
        assert_eq!(
            settings.booking_config().quote_ttl,
            TimeDelta::seconds(BookingConfig::MAX_QUOTE_TTL_SECONDS)
        );
    }

    #[test]
    fn test_settings_map_to_booking_config() {
        let settings = BookingSettings {
            quote_ttl_seconds: 600,
            reaper_interval_seconds: 30,
            tax_rate_basis_points: 1800,
            service_charge_minor: 2500,
            stay_policy: StayPolicy::Reject,
        };
        let config = settings.booking_config();

        assert_eq!(config.quote_ttl, TimeDelta::minutes(10));
        assert_eq!(config.reaper_interval, Duration::from_secs(30));
        assert_eq!(config.pricing.tax_rate.basis_points(), 1800);
        assert_eq!(config.pricing.surcharge, Money::from_minor(2500));
        assert_eq!(config.stay_policy, StayPolicy::Reject);
    }

    #[test]
    fn test_default_settings_match_runtime_defaults() {
        let settings = BookingSettings {
            quote_ttl_seconds: BookingConfig::DEFAULT_QUOTE_TTL_SECONDS,
            reaper_interval_seconds: BookingConfig::DEFAULT_REAPER_INTERVAL_SECONDS,
            tax_rate_basis_points: TaxRate::STANDARD.basis_points(),
            service_charge_minor: PricingPolicy::STANDARD_SURCHARGE.minor(),
            stay_policy: StayPolicy::default(),
        };
        assert_eq!(settings.booking_config(), BookingConfig::default());
    }
}
