//! Domain types for guest-house reservations.
//!
//! Properties and room categories are provisioned once and only ever change through the
//! `available_count` decrement performed at commit time. Quotes are ephemeral proposals
//! that may be rejected if inventory changed underneath them.

use crate::error::BookingError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a property (guest house)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(u32);

impl PropertyId {
    /// Creates a `PropertyId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a room category row
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCategoryId(u32);

impl RoomCategoryId {
    /// Creates a `RoomCategoryId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RoomCategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a committed reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token handed to the caller in exchange for a pending reservation.
///
/// The token is the only handle to a quote; presenting it to commit consumes the quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteToken(Uuid);

impl QuoteToken {
    /// Creates a new random `QuoteToken`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QuoteToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuoteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuoteToken {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| BookingError::InvalidInput(format!("Malformed quote token: {s}")))
    }
}

// ============================================================================
// Money Value Object (minor units to avoid floating point errors)
// ============================================================================

/// Represents money in minor units (1/100 of the currency unit)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from minor units
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates a `Money` value from whole currency units
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (`major * 100 > u64::MAX`).
    /// Use `checked_from_major` for non-panicking conversion.
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_major(major: u64) -> Self {
        match major.checked_mul(100) {
            Some(minor) => Self(minor),
            None => panic!("Money::from_major overflow"),
        }
    }

    /// Creates a `Money` value from whole currency units with overflow checking
    #[must_use]
    pub const fn checked_from_major(major: u64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Returns the whole currency units (rounded down)
    #[must_use]
    pub const fn major(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major(), self.0 % 100)
    }
}

// ============================================================================
// Guests
// ============================================================================

/// Guest gender as recorded by the identity layer and the booking form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male guest
    Male,
    /// Female guest
    Female,
    /// Any other gender
    Other,
}

impl Gender {
    /// Canonical spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(BookingError::InvalidInput(format!("Unrecognised guest gender: {s:?}"))),
        }
    }
}

/// Identity of a verified guest, supplied by the identity layer.
///
/// Read-only from the booking core's perspective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestIdentity {
    /// Opaque student identifier used to sign in
    pub student_id: String,
    /// Enrollment code
    pub enrollment_no: String,
    /// Display name
    pub name: String,
    /// Gender on record
    pub gender: Gender,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

// ============================================================================
// Properties and Room Categories
// ============================================================================

/// Eligibility restriction attached to a property
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Restriction {
    /// Anyone may book
    None,
    /// Only guests matching the named category may book (e.g. "Women Only")
    Category(String),
}

impl Restriction {
    /// Stored spelling of the restriction
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "None",
            Self::Category(category) => category,
        }
    }
}

impl From<String> for Restriction {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            Self::None
        } else {
            Self::Category(trimmed.to_string())
        }
    }
}

impl From<&str> for Restriction {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Restriction> for String {
    fn from(value: Restriction) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest house. Immutable after provisioning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property identifier
    pub id: PropertyId,
    /// Display name
    pub name: String,
    /// Eligibility restriction
    pub restriction: Restriction,
}

/// Natural key of a room category: `(property_id, label)`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomKey {
    /// Owning property
    pub property_id: PropertyId,
    /// Room category label (e.g. "Single AC")
    pub label: String,
}

impl RoomKey {
    /// Creates a new `RoomKey`
    #[must_use]
    pub fn new(property_id: PropertyId, label: impl Into<String>) -> Self {
        Self {
            property_id,
            label: label.into(),
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.property_id, self.label)
    }
}

/// A priced, countable class of rooms within a property.
///
/// `available_count` is the only field that changes after provisioning, and only
/// through the commit path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCategory {
    /// Row identifier
    pub id: RoomCategoryId,
    /// Back-reference to the owning property
    pub property_id: PropertyId,
    /// Category label
    pub label: String,
    /// Price per night
    pub unit_price: Money,
    /// Units still available
    pub available_count: u32,
}

impl RoomCategory {
    /// Natural key of this category
    #[must_use]
    pub fn key(&self) -> RoomKey {
        RoomKey::new(self.property_id, self.label.clone())
    }

    /// True when no units remain
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.available_count == 0
    }
}

// ============================================================================
// Provisioning
// ============================================================================

/// Room category to provision at initialization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSeed {
    /// Category label
    pub label: String,
    /// Price per night (must be positive)
    pub unit_price: Money,
    /// Initial unit count
    pub count: u32,
}

/// Property to provision at initialization, with its room categories
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySeed {
    /// Property identifier
    pub id: PropertyId,
    /// Display name
    pub name: String,
    /// Eligibility restriction
    pub restriction: Restriction,
    /// Room categories owned by the property
    pub rooms: Vec<RoomSeed>,
}

// ============================================================================
// Availability
// ============================================================================

/// Availability of one room category, as shown to guests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAvailability {
    /// Row identifier
    pub id: RoomCategoryId,
    /// Category label
    pub label: String,
    /// Price per night
    pub unit_price: Money,
    /// Units still available
    pub available_count: u32,
}

impl From<&RoomCategory> for RoomAvailability {
    fn from(room: &RoomCategory) -> Self {
        Self {
            id: room.id,
            label: room.label.clone(),
            unit_price: room.unit_price,
            available_count: room.available_count,
        }
    }
}

/// A property with the live availability of its room categories
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAvailability {
    /// The property
    pub property: Property,
    /// Its room categories
    pub rooms: Vec<RoomAvailability>,
}

impl PropertyAvailability {
    /// True when every room category of this property is sold out
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.rooms.iter().all(|room| room.available_count == 0)
    }
}

/// Availability across every property
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Properties in id order
    pub properties: Vec<PropertyAvailability>,
    /// True when no room category anywhere has a unit left
    pub all_sold_out: bool,
}

impl AvailabilityReport {
    /// Builds a report, deriving `all_sold_out`
    #[must_use]
    pub fn new(properties: Vec<PropertyAvailability>) -> Self {
        let all_sold_out = properties.iter().all(PropertyAvailability::is_sold_out);
        Self {
            properties,
            all_sold_out,
        }
    }
}

// ============================================================================
// Quotes and Reservations
// ============================================================================

/// A request to quote a stay, as received from any front end.
///
/// Dates and gender are kept as strings because parsing them is part of building a quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Property to book
    pub property_id: PropertyId,
    /// Room category label
    pub room_label: String,
    /// Gender of the guest who will stay (may differ from the booking student)
    pub guest_gender: String,
    /// Name of the guest who will stay
    pub guest_name: String,
    /// Arrival date, `YYYY-MM-DD`
    pub arrival_date: String,
    /// Departure date, `YYYY-MM-DD`
    pub departure_date: String,
}

/// Priced snapshot of a requested stay.
///
/// Denormalizes the property name so the quote can be displayed without another lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDetails {
    /// Property to book
    pub property_id: PropertyId,
    /// Property name at quote time
    pub property_name: String,
    /// Room category label
    pub room_label: String,
    /// Guest name
    pub guest_name: String,
    /// Guest gender
    pub guest_gender: Gender,
    /// Arrival date
    pub arrival_date: NaiveDate,
    /// Departure date
    pub departure_date: NaiveDate,
    /// Nights charged (at least 1)
    pub night_count: u32,
    /// Price per night at quote time
    pub unit_price: Money,
    /// `unit_price * night_count`
    pub base_amount: Money,
    /// Tax on the base amount
    pub tax_amount: Money,
    /// Fixed service charge
    pub surcharge: Money,
    /// `base + tax + surcharge`
    pub total_amount: Money,
}

impl QuoteDetails {
    /// Natural key of the room category being booked
    #[must_use]
    pub fn room_key(&self) -> RoomKey {
        RoomKey::new(self.property_id, self.room_label.clone())
    }
}

/// A quote awaiting confirmation.
///
/// Deliberately not `Clone`: committing takes it by value, so one quote can produce at
/// most one commit attempt.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingReservation {
    token: QuoteToken,
    details: QuoteDetails,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl PendingReservation {
    /// Creates a pending reservation with a fresh token
    #[must_use]
    pub fn new(details: QuoteDetails, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: QuoteToken::new(),
            details,
            issued_at,
            expires_at,
        }
    }

    /// Token identifying this quote
    #[must_use]
    pub const fn token(&self) -> QuoteToken {
        self.token
    }

    /// Priced snapshot
    #[must_use]
    pub const fn details(&self) -> &QuoteDetails {
        &self.details
    }

    /// When the quote was built
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the quote stops being honoured
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True once `now` has reached the expiry instant
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The caller-facing view of this quote
    #[must_use]
    pub fn issued(&self) -> IssuedQuote {
        IssuedQuote {
            token: self.token,
            expires_at: self.expires_at,
            details: self.details.clone(),
        }
    }

    /// Consumes the reservation, yielding its snapshot
    #[must_use]
    pub fn into_details(self) -> QuoteDetails {
        self.details
    }
}

/// What a caller receives after a successful quote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedQuote {
    /// Token to present at commit
    pub token: QuoteToken,
    /// Deadline for committing
    pub expires_at: DateTime<Utc>,
    /// Priced snapshot
    pub details: QuoteDetails,
}

/// Receipt for a reservation whose inventory has been committed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedReservation {
    /// Reservation identifier
    pub reservation_id: ReservationId,
    /// Token of the quote that was consumed
    pub quote_token: QuoteToken,
    /// Snapshot of what was booked and charged
    pub details: QuoteDetails,
    /// When inventory was decremented
    pub committed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display_and_units() {
        let amount = Money::from_minor(273_800);
        assert_eq!(amount.major(), 2738);
        assert_eq!(amount.to_string(), "2738.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_major(50), Money::from_minor(5000));
    }

    #[test]
    fn test_money_overflow_is_checked() {
        assert!(Money::checked_from_major(u64::MAX).is_none());
        assert!(Money::from_minor(u64::MAX).checked_add(Money::from_minor(1)).is_none());
        assert!(Money::from_minor(u64::MAX).checked_multiply(2).is_none());
    }

    #[test]
    fn test_gender_parsing_is_case_insensitive() {
        assert_eq!("female".parse::<Gender>().ok(), Some(Gender::Female));
        assert_eq!(" MALE ".parse::<Gender>().ok(), Some(Gender::Male));
        assert!(matches!(
            "unknown".parse::<Gender>(),
            Err(BookingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_restriction_none_spellings() {
        assert_eq!(Restriction::from("None"), Restriction::None);
        assert_eq!(Restriction::from(""), Restriction::None);
        assert_eq!(
            Restriction::from("Women Only"),
            Restriction::Category("Women Only".to_string())
        );
    }

    #[test]
    fn test_restriction_serializes_as_string() {
        let json = serde_json::to_string(&Restriction::Category("Women Only".into()));
        assert_eq!(json.ok().as_deref(), Some("\"Women Only\""));
        let parsed: Result<Restriction, _> = serde_json::from_str("\"None\"");
        assert_eq!(parsed.ok(), Some(Restriction::None));
    }

    #[test]
    fn test_quote_token_parse() {
        let token = QuoteToken::new();
        assert_eq!(token.to_string().parse::<QuoteToken>().ok(), Some(token));
        assert!("not-a-token".parse::<QuoteToken>().is_err());
    }

    #[test]
    fn test_availability_report_all_sold_out() {
        let property = Property {
            id: PropertyId::new(1),
            name: "Common Guest House".to_string(),
            restriction: Restriction::None,
        };
        let room = |count| RoomAvailability {
            id: RoomCategoryId::new(1),
            label: "Single AC".to_string(),
            unit_price: Money::from_major(1200),
            available_count: count,
        };

        let open = AvailabilityReport::new(vec![PropertyAvailability {
            property: property.clone(),
            rooms: vec![room(0), room(1)],
        }]);
        assert!(!open.all_sold_out);

        let full = AvailabilityReport::new(vec![PropertyAvailability {
            property,
            rooms: vec![room(0), room(0)],
        }]);
        assert!(full.all_sold_out);
    }
}
