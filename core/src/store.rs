//! Inventory Store abstraction.
//!
//! The store is the only shared mutable resource in the system. Reads are advisory; the
//! single mutation, [`InventoryStore::compare_and_decrement`], is an atomic compare-and-swap
//! on one room category's `available_count`.
//!
//! # Implementations
//!
//! - `InMemoryInventoryStore` (in `guesthouse-runtime`): per-room mutexes
//! - `PostgresInventoryStore` (in `guesthouse-postgres`): conditional `UPDATE`
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the store can be
//! injected as `Arc<dyn InventoryStore>`.

use crate::error::StoreError;
use crate::types::{Property, PropertyAvailability, PropertyId, PropertySeed, RoomCategory, RoomKey};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Outcome of a compare-and-decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The count matched and was decremented by one.
    Applied {
        /// Units left after the decrement
        remaining: u32,
    },
    /// The count no longer matched the expected value; nothing changed.
    Stale,
}

/// Durable record of properties, room categories and remaining unit counts.
pub trait InventoryStore: Send + Sync {
    /// Provision the store from `seed` if, and only if, it holds no properties yet.
    ///
    /// Returns `true` when the seed was applied, `false` when the store was already
    /// populated and left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSeed`] for duplicate keys or non-positive prices, and
    /// [`StoreError::Database`] on backend failure.
    fn initialize<'a>(&'a self, seed: &'a [PropertySeed]) -> StoreFuture<'a, bool>;

    /// All properties in id order, with their room categories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn list_inventory(&self) -> StoreFuture<'_, Vec<PropertyAvailability>>;

    /// One property with its room categories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn property_inventory(&self, id: PropertyId) -> StoreFuture<'_, Option<PropertyAvailability>>;

    /// One property, without any room data.
    ///
    /// Used before eligibility has been established, so it must not expose availability.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn get_property(&self, id: PropertyId) -> StoreFuture<'_, Option<Property>>;

    /// Current state of one room category.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn get_room<'a>(&'a self, key: &'a RoomKey) -> StoreFuture<'a, Option<RoomCategory>>;

    /// Atomically decrement `available_count` by one if it still equals `expected`.
    ///
    /// `expected == 0` never applies. This is the only mutation of inventory; callers
    /// other than the commit coordinator should not use it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure, or when the room does not exist.
    fn compare_and_decrement<'a>(
        &'a self,
        key: &'a RoomKey,
        expected: u32,
    ) -> StoreFuture<'a, DecrementOutcome>;
}

/// Validates a seed set before any backend writes it.
///
/// # Errors
///
/// Returns [`StoreError::InvalidSeed`] on duplicate property ids, duplicate
/// `(property, label)` pairs, empty labels or zero prices.
pub fn validate_seed(seed: &[PropertySeed]) -> Result<(), StoreError> {
    let mut property_ids = std::collections::HashSet::new();
    let mut room_keys = std::collections::HashSet::new();

    for property in seed {
        if !property_ids.insert(property.id) {
            return Err(StoreError::InvalidSeed(format!(
                "duplicate property id {}",
                property.id
            )));
        }
        for room in &property.rooms {
            if room.label.trim().is_empty() {
                return Err(StoreError::InvalidSeed(format!(
                    "empty room label at property {}",
                    property.id
                )));
            }
            if room.unit_price.is_zero() {
                return Err(StoreError::InvalidSeed(format!(
                    "room '{}' at property {} has no price",
                    room.label, property.id
                )));
            }
            if !room_keys.insert(RoomKey::new(property.id, room.label.clone())) {
                return Err(StoreError::InvalidSeed(format!(
                    "duplicate room '{}' at property {}",
                    room.label, property.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, Restriction, RoomSeed};

    fn seed_with_rooms(rooms: Vec<RoomSeed>) -> Vec<PropertySeed> {
        vec![PropertySeed {
            id: PropertyId::new(2),
            name: "Common Guest House".to_string(),
            restriction: Restriction::None,
            rooms,
        }]
    }

    fn room(label: &str, price: u64) -> RoomSeed {
        RoomSeed {
            label: label.to_string(),
            unit_price: Money::from_major(price),
            count: 3,
        }
    }

    #[test]
    fn test_valid_seed_passes() {
        let seed = seed_with_rooms(vec![room("Single AC", 1200), room("Shared AC", 600)]);
        assert_eq!(validate_seed(&seed), Ok(()));
    }

    #[test]
    fn test_duplicate_room_label_rejected() {
        let seed = seed_with_rooms(vec![room("Single AC", 1200), room("Single AC", 900)]);
        assert!(matches!(validate_seed(&seed), Err(StoreError::InvalidSeed(_))));
    }

    #[test]
    fn test_zero_price_rejected() {
        let seed = seed_with_rooms(vec![room("Single AC", 0)]);
        assert!(matches!(validate_seed(&seed), Err(StoreError::InvalidSeed(_))));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let mut seed = seed_with_rooms(vec![room("Single AC", 1200)]);
        seed.push(seed[0].clone());
        assert!(matches!(validate_seed(&seed), Err(StoreError::InvalidSeed(_))));
    }
}
