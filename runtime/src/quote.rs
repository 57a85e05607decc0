//! Quote Builder.
//!
//! Turns a `QuoteRequest` into a `PendingReservation` without touching inventory. The
//! availability check here is advisory only; the commit coordinator re-checks atomically.
//!
//! Check order matters: the eligibility decision is taken from the property record alone,
//! before any room is read, so an ineligible guest learns nothing about live availability
//! of a restricted property.

use crate::config::StayPolicy;
use chrono::{NaiveDate, TimeDelta};
use guesthouse_core::{
    BookingError, Clock, EligibilityPolicy, Gender, InventoryStore, PendingReservation,
    PricingPolicy, QuoteDetails, QuoteRequest, RoomKey,
};
use std::sync::Arc;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds priced, uncommitted quotes
#[derive(Clone)]
pub struct QuoteBuilder {
    store: Arc<dyn InventoryStore>,
    eligibility: Arc<EligibilityPolicy>,
    pricing: PricingPolicy,
    stay_policy: StayPolicy,
    quote_ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl QuoteBuilder {
    /// Creates a new `QuoteBuilder`
    #[must_use]
    pub fn new(
        store: Arc<dyn InventoryStore>,
        eligibility: Arc<EligibilityPolicy>,
        pricing: PricingPolicy,
        stay_policy: StayPolicy,
        quote_ttl: TimeDelta,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            eligibility,
            pricing,
            stay_policy,
            quote_ttl,
            clock,
        }
    }

    /// Validate and price a request.
    ///
    /// # Errors
    ///
    /// In check order:
    /// - [`BookingError::PropertyNotFound`] for an unknown property
    /// - [`BookingError::InvalidInput`] for an unrecognised gender
    /// - [`BookingError::Eligibility`] when the property's restriction excludes the guest
    /// - [`BookingError::InvalidInput`] for a blank name, malformed dates, or (under
    ///   [`StayPolicy::Reject`]) a non-positive stay
    /// - [`BookingError::RoomNotFound`] for an unknown room label
    /// - [`BookingError::SoldOut`] when the room shows no availability right now
    /// - [`BookingError::Configuration`] when the quote TTL overflows the expiry instant
    pub async fn build(&self, request: &QuoteRequest) -> Result<PendingReservation, BookingError> {
        let property = self
            .store
            .get_property(request.property_id)
            .await?
            .ok_or(BookingError::PropertyNotFound(request.property_id))?;

        let guest_gender: Gender = request.guest_gender.parse()?;
        self.eligibility.check(&property, guest_gender)?;

        let guest_name = request.guest_name.trim();
        if guest_name.is_empty() {
            return Err(BookingError::InvalidInput("Guest name is required".to_string()));
        }

        let arrival_date = parse_date("arrival", &request.arrival_date)?;
        let departure_date = parse_date("departure", &request.departure_date)?;
        let night_count = self.night_count(arrival_date, departure_date)?;

        let key = RoomKey::new(property.id, request.room_label.trim());
        let room = self
            .store
            .get_room(&key)
            .await?
            .ok_or_else(|| BookingError::RoomNotFound {
                property_id: property.id,
                label: key.label.clone(),
            })?;
        if room.is_sold_out() {
            return Err(BookingError::SoldOut {
                property_id: property.id,
                label: room.label,
            });
        }

        let price = self.pricing.compute_quote(room.unit_price, night_count)?;
        let issued_at = self.clock.now();
        let expires_at = issued_at.checked_add_signed(self.quote_ttl).ok_or_else(|| {
            BookingError::Configuration(format!(
                "Quote TTL of {}s runs past the supported calendar",
                self.quote_ttl.num_seconds()
            ))
        })?;

        tracing::debug!(
            property_id = %property.id,
            room = %room.label,
            nights = price.night_count,
            total = %price.total,
            "Quote built"
        );

        Ok(PendingReservation::new(
            QuoteDetails {
                property_id: property.id,
                property_name: property.name,
                room_label: room.label,
                guest_name: guest_name.to_string(),
                guest_gender,
                arrival_date,
                departure_date,
                night_count: price.night_count,
                unit_price: room.unit_price,
                base_amount: price.base,
                tax_amount: price.tax,
                surcharge: price.surcharge,
                total_amount: price.total,
            },
            issued_at,
            expires_at,
        ))
    }

    fn night_count(&self, arrival: NaiveDate, departure: NaiveDate) -> Result<i64, BookingError> {
        let nights = (departure - arrival).num_days();
        if nights <= 0 {
            match self.stay_policy {
                StayPolicy::Reject => {
                    return Err(BookingError::InvalidInput(format!(
                        "Departure {departure} must be after arrival {arrival}"
                    )));
                }
                StayPolicy::Clamp => {
                    tracing::debug!(%arrival, %departure, "Non-positive stay charged as one night");
                }
            }
        }
        Ok(nights)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        BookingError::InvalidInput(format!("The {field} date {value:?} is not a YYYY-MM-DD date"))
    })
}
