//! Pricing Engine: exact charge for a stay.
//!
//! ```text
//! base      = unit_price * nights        (nights floored to 1)
//! tax       = base * tax_rate            (rounded half-up to a minor unit)
//! total     = base + tax + surcharge
//! ```
//!
//! All arithmetic is on integer minor units; nothing here touches floating point.

use crate::error::BookingError;
use crate::types::Money;
use serde::{Deserialize, Serialize};

const BASIS_POINTS_PER_UNIT: u128 = 10_000;

/// Tax rate expressed in basis points (1/100 of a percent)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// 12%, the goods and services tax of the reference deployment
    pub const STANDARD: Self = Self(1_200);

    /// Creates a rate from basis points (`1200` = 12%)
    #[must_use]
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    /// Rate in basis points
    #[must_use]
    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    /// Applies the rate to an amount, rounding half-up to the nearest minor unit.
    #[must_use]
    pub fn apply(&self, amount: Money) -> Option<Money> {
        let scaled = u128::from(amount.minor()) * u128::from(self.0);
        let rounded = (scaled + BASIS_POINTS_PER_UNIT / 2) / BASIS_POINTS_PER_UNIT;
        u64::try_from(rounded).ok().map(Money::from_minor)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Pricing parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Tax applied to the base amount
    pub tax_rate: TaxRate,
    /// Flat service charge added once per booking
    pub surcharge: Money,
}

impl PricingPolicy {
    /// Flat service charge of the reference deployment (50.00)
    pub const STANDARD_SURCHARGE: Money = Money::from_major(50);

    /// Creates a policy
    #[must_use]
    pub const fn new(tax_rate: TaxRate, surcharge: Money) -> Self {
        Self {
            tax_rate,
            surcharge,
        }
    }

    /// Prices a stay.
    ///
    /// `night_count` is floored to 1: a zero or negative duration is charged as one night.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidInput`] when the stay is too long to represent or
    /// an amount overflows.
    pub fn compute_quote(
        &self,
        unit_price: Money,
        night_count: i64,
    ) -> Result<PriceBreakdown, BookingError> {
        let nights = u32::try_from(night_count.max(1)).map_err(|_| {
            BookingError::InvalidInput(format!("Stay of {night_count} nights is too long"))
        })?;

        let overflow = || BookingError::InvalidInput("Booking amount is too large".to_string());
        let base = unit_price.checked_multiply(nights).ok_or_else(overflow)?;
        let tax = self.tax_rate.apply(base).ok_or_else(overflow)?;
        let total = base
            .checked_add(tax)
            .and_then(|subtotal| subtotal.checked_add(self.surcharge))
            .ok_or_else(overflow)?;

        Ok(PriceBreakdown {
            night_count: nights,
            base,
            tax,
            surcharge: self.surcharge,
            total,
        })
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::new(TaxRate::STANDARD, Self::STANDARD_SURCHARGE)
    }
}

/// Result of pricing a stay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Nights charged, after flooring
    pub night_count: u32,
    /// `unit_price * night_count`
    pub base: Money,
    /// Tax on `base`
    pub tax: Money,
    /// Flat service charge
    pub surcharge: Money,
    /// Amount due
    pub total: Money,
}
