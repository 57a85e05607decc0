//! In-memory Inventory Store.
//!
//! Each room category lives behind its own mutex, so a compare-and-decrement on one
//! category never waits on another. The catalog map itself is only written during
//! initialization; afterwards it is read-locked for lookups.

use guesthouse_core::store::validate_seed;
use guesthouse_core::{
    DecrementOutcome, InventoryStore, Property, PropertyAvailability, PropertyId, PropertySeed,
    RoomAvailability, RoomCategory, RoomCategoryId, RoomKey, StoreError, StoreFuture,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Default)]
struct Catalog {
    properties: BTreeMap<PropertyId, Property>,
    /// Room keys per property, in provisioning order
    layout: BTreeMap<PropertyId, Vec<RoomKey>>,
    rooms: HashMap<RoomKey, Arc<Mutex<RoomCategory>>>,
}

impl Catalog {
    async fn snapshot(&self, id: PropertyId) -> Option<PropertyAvailability> {
        let property = self.properties.get(&id)?.clone();
        let mut rooms = Vec::new();
        for key in self.layout.get(&id).into_iter().flatten() {
            if let Some(room) = self.rooms.get(key) {
                rooms.push(RoomAvailability::from(&*room.lock().await));
            }
        }
        Some(PropertyAvailability { property, rooms })
    }
}

/// Inventory store held entirely in process memory.
///
/// Create one per test or per process and pass it around explicitly; there is no global
/// instance.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryInventoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already provisioned from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSeed`] if the seed is inconsistent.
    pub async fn with_seed(seed: &[PropertySeed]) -> Result<Self, StoreError> {
        let store = Self::new();
        store.initialize(seed).await?;
        Ok(store)
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn initialize<'a>(&'a self, seed: &'a [PropertySeed]) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            validate_seed(seed)?;

            let mut catalog = self.catalog.write().await;
            if !catalog.properties.is_empty() {
                return Ok(false);
            }

            let mut next_room_id = 1u32;
            for property in seed {
                catalog.properties.insert(
                    property.id,
                    Property {
                        id: property.id,
                        name: property.name.clone(),
                        restriction: property.restriction.clone(),
                    },
                );

                let mut keys = Vec::with_capacity(property.rooms.len());
                for room in &property.rooms {
                    let category = RoomCategory {
                        id: RoomCategoryId::new(next_room_id),
                        property_id: property.id,
                        label: room.label.clone(),
                        unit_price: room.unit_price,
                        available_count: room.count,
                    };
                    next_room_id += 1;
                    keys.push(category.key());
                    catalog
                        .rooms
                        .insert(category.key(), Arc::new(Mutex::new(category)));
                }
                catalog.layout.insert(property.id, keys);
            }

            Ok(true)
        })
    }

    fn list_inventory(&self) -> StoreFuture<'_, Vec<PropertyAvailability>> {
        Box::pin(async move {
            let catalog = self.catalog.read().await;
            let mut inventory = Vec::with_capacity(catalog.properties.len());
            for id in catalog.properties.keys() {
                if let Some(snapshot) = catalog.snapshot(*id).await {
                    inventory.push(snapshot);
                }
            }
            Ok(inventory)
        })
    }

    fn property_inventory(&self, id: PropertyId) -> StoreFuture<'_, Option<PropertyAvailability>> {
        Box::pin(async move { Ok(self.catalog.read().await.snapshot(id).await) })
    }

    fn get_property(&self, id: PropertyId) -> StoreFuture<'_, Option<Property>> {
        Box::pin(async move { Ok(self.catalog.read().await.properties.get(&id).cloned()) })
    }

    fn get_room<'a>(&'a self, key: &'a RoomKey) -> StoreFuture<'a, Option<RoomCategory>> {
        Box::pin(async move {
            let room = self.catalog.read().await.rooms.get(key).cloned();
            match room {
                Some(room) => Ok(Some(room.lock().await.clone())),
                None => Ok(None),
            }
        })
    }

    fn compare_and_decrement<'a>(
        &'a self,
        key: &'a RoomKey,
        expected: u32,
    ) -> StoreFuture<'a, DecrementOutcome> {
        Box::pin(async move {
            let room = self
                .catalog
                .read()
                .await
                .rooms
                .get(key)
                .cloned()
                .ok_or_else(|| StoreError::Corrupt(format!("room {key} is not provisioned")))?;

            let mut room = room.lock().await;
            if expected == 0 || room.available_count != expected {
                return Ok(DecrementOutcome::Stale);
            }
            room.available_count -= 1;
            Ok(DecrementOutcome::Applied {
                remaining: room.available_count,
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use guesthouse_core::{Money, Restriction, RoomSeed};

    fn seed(count: u32) -> Vec<PropertySeed> {
        vec![PropertySeed {
            id: PropertyId::new(2),
            name: "Common Guest House".to_string(),
            restriction: Restriction::None,
            rooms: vec![
                RoomSeed {
                    label: "Single AC".to_string(),
                    unit_price: Money::from_major(1200),
                    count,
                },
                RoomSeed {
                    label: "Shared AC".to_string(),
                    unit_price: Money::from_major(600),
                    count: 8,
                },
            ],
        }]
    }

    fn single_ac() -> RoomKey {
        RoomKey::new(PropertyId::new(2), "Single AC")
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = InMemoryInventoryStore::new();
        assert_eq!(store.initialize(&seed(5)).await, Ok(true));
        assert_eq!(store.initialize(&seed(99)).await, Ok(false));

        let room = store.get_room(&single_ac()).await.ok().flatten();
        assert_eq!(room.map(|r| r.available_count), Some(5));
    }

    #[tokio::test]
    async fn test_room_ids_follow_provisioning_order() {
        let store = InMemoryInventoryStore::with_seed(&seed(5))
            .await
            .expect("valid seed");
        let inventory = store.list_inventory().await.expect("list inventory");
        let ids: Vec<u32> = inventory
            .iter()
            .flat_map(|p| p.rooms.iter().map(|r| r.id.value()))
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_compare_and_decrement_requires_matching_count() {
        let store = InMemoryInventoryStore::with_seed(&seed(2))
            .await
            .expect("valid seed");

        assert_eq!(
            store.compare_and_decrement(&single_ac(), 3).await,
            Ok(DecrementOutcome::Stale)
        );
        assert_eq!(
            store.compare_and_decrement(&single_ac(), 2).await,
            Ok(DecrementOutcome::Applied { remaining: 1 })
        );
        assert_eq!(
            store.compare_and_decrement(&single_ac(), 1).await,
            Ok(DecrementOutcome::Applied { remaining: 0 })
        );
        assert_eq!(
            store.compare_and_decrement(&single_ac(), 0).await,
            Ok(DecrementOutcome::Stale)
        );
    }

    #[tokio::test]
    async fn test_decrement_unknown_room_is_an_error() {
        let store = InMemoryInventoryStore::with_seed(&seed(2))
            .await
            .expect("valid seed");
        let missing = RoomKey::new(PropertyId::new(2), "Penthouse");
        assert!(matches!(
            store.compare_and_decrement(&missing, 1).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_get_property_has_no_room_data() {
        let store = InMemoryInventoryStore::with_seed(&seed(2))
            .await
            .expect("valid seed");
        let property = store.get_property(PropertyId::new(2)).await.ok().flatten();
        assert_eq!(property.map(|p| p.name), Some("Common Guest House".to_string()));
        assert_eq!(store.get_property(PropertyId::new(9)).await, Ok(None));
    }
}
