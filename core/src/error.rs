//! Error taxonomy for the booking core.
//!
//! Every failure is reported to the immediate caller as a typed result. Nothing here is
//! retried automatically; re-quoting after a rejection is the caller's decision.

use crate::identity::AuthError;
use crate::types::{PropertyId, QuoteToken};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by an inventory store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing database failed or was unreachable.
    #[error("Database error: {0}")]
    Database(String),

    /// The provisioning data was rejected.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    /// A stored row could not be mapped back into a domain value.
    #[error("Corrupt inventory row: {0}")]
    Corrupt(String),
}

/// Errors returned by booking operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The property does not exist.
    #[error("Guest house {0} does not exist")]
    PropertyNotFound(PropertyId),

    /// The property exists but has no room category with this label.
    #[error("Room type '{label}' is not offered at guest house {property_id}")]
    RoomNotFound {
        /// Property that was searched
        property_id: PropertyId,
        /// Requested label
        label: String,
    },

    /// The quote token is unknown or was already consumed.
    #[error("Quote {0} does not exist or has already been used")]
    UnknownQuote(QuoteToken),

    /// The property's restriction excludes this guest.
    #[error("Restriction error: {property_name} accepts {required} guests only")]
    Eligibility {
        /// Restricted property
        property_id: PropertyId,
        /// Its name, for the message
        property_name: String,
        /// The restriction category the guest failed to satisfy
        required: String,
    },

    /// The request could not be interpreted (dates, gender, names, durations).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No unit of the room category is left.
    #[error("Sorry, {label} is sold out at guest house {property_id}")]
    SoldOut {
        /// Property of the room category
        property_id: PropertyId,
        /// Room category label
        label: String,
    },

    /// The quote outlived its time-to-live and can no longer be committed.
    #[error("Quote {token} expired at {expired_at}; please request a new quote")]
    Expired {
        /// Token of the expired quote
        token: QuoteToken,
        /// When it expired
        expired_at: DateTime<Utc>,
    },

    /// Credential verification failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The inventory store failed.
    #[error("Inventory store failure: {0}")]
    Store(#[from] StoreError),

    /// A booking setting cannot be applied, such as a quote TTL past the calendar range.
    #[error("Booking configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification of a [`BookingError`], used by front ends to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown property, room or quote
    NotFound,
    /// Restriction violated
    Eligibility,
    /// Malformed request
    InvalidInput,
    /// No availability, at quote or commit time
    SoldOut,
    /// Credential mismatch
    Auth,
    /// Quote past its TTL
    Expired,
    /// Unclassified internal failure
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Eligibility => "ELIGIBILITY",
            Self::InvalidInput => "INVALID_INPUT",
            Self::SoldOut => "SOLD_OUT",
            Self::Auth => "AUTH",
            Self::Expired => "EXPIRED",
            Self::Internal => "INTERNAL",
        }
    }
}

impl BookingError {
    /// Classifies the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PropertyNotFound(_) | Self::RoomNotFound { .. } | Self::UnknownQuote(_) => {
                ErrorKind::NotFound
            }
            Self::Eligibility { .. } => ErrorKind::Eligibility,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::SoldOut { .. } => ErrorKind::SoldOut,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Store(_) | Self::Configuration(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct_per_variant() {
        let property_id = PropertyId::new(2);
        let cases = [
            (BookingError::PropertyNotFound(property_id), ErrorKind::NotFound),
            (
                BookingError::Eligibility {
                    property_id,
                    property_name: "Dr. Anandi Gopal Guest House".into(),
                    required: "Women Only".into(),
                },
                ErrorKind::Eligibility,
            ),
            (BookingError::InvalidInput("bad date".into()), ErrorKind::InvalidInput),
            (
                BookingError::SoldOut {
                    property_id,
                    label: "Single AC".into(),
                },
                ErrorKind::SoldOut,
            ),
            (
                BookingError::Auth(AuthError::InvalidCredentials),
                ErrorKind::Auth,
            ),
            (
                BookingError::Store(StoreError::Database("down".into())),
                ErrorKind::Internal,
            ),
            (
                BookingError::Configuration("quote TTL out of range".into()),
                ErrorKind::Internal,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }

    #[test]
    fn test_sold_out_message_names_room() {
        let error = BookingError::SoldOut {
            property_id: PropertyId::new(2),
            label: "Single AC".into(),
        };
        assert_eq!(
            error.to_string(),
            "Sorry, Single AC is sold out at guest house 2"
        );
    }
}
