//! Booking policy configuration.
//!
//! Kept separate from process configuration so tests can build services directly.

use chrono::TimeDelta;
use guesthouse_core::{BookingError, Money, PricingPolicy, TaxRate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// What to do with a stay whose departure is not after its arrival
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StayPolicy {
    /// Charge it as a single night
    #[default]
    Clamp,
    /// Reject it as invalid input
    Reject,
}

impl FromStr for StayPolicy {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            other => Err(BookingError::InvalidInput(format!(
                "Unknown stay policy '{other}' (expected 'clamp' or 'reject')"
            ))),
        }
    }
}

/// Tunables of the booking runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingConfig {
    /// How long an issued quote may be committed
    pub quote_ttl: TimeDelta,
    /// How often expired quotes are swept from the arena
    pub reaper_interval: Duration,
    /// Tax rate and service charge
    pub pricing: PricingPolicy,
    /// Handling of non-positive stay durations
    pub stay_policy: StayPolicy,
}

impl BookingConfig {
    /// Default quote time-to-live (15 minutes)
    pub const DEFAULT_QUOTE_TTL_SECONDS: i64 = 900;
    /// Longest accepted quote time-to-live (one week)
    pub const MAX_QUOTE_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
    /// Default reaper interval (1 minute)
    pub const DEFAULT_REAPER_INTERVAL_SECONDS: u64 = 60;

    /// Overrides the quote TTL
    #[must_use]
    pub const fn with_quote_ttl(mut self, ttl: TimeDelta) -> Self {
        self.quote_ttl = ttl;
        self
    }

    /// Overrides the stay policy
    #[must_use]
    pub const fn with_stay_policy(mut self, stay_policy: StayPolicy) -> Self {
        self.stay_policy = stay_policy;
        self
    }

    /// Overrides the pricing policy
    #[must_use]
    pub const fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            quote_ttl: TimeDelta::seconds(Self::DEFAULT_QUOTE_TTL_SECONDS),
            reaper_interval: Duration::from_secs(Self::DEFAULT_REAPER_INTERVAL_SECONDS),
            pricing: PricingPolicy::new(TaxRate::STANDARD, Money::from_major(50)),
            stay_policy: StayPolicy::Clamp,
        }
    }
}
