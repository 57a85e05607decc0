//! Starter inventory and idempotent initialization.
//!
//! Three guest houses, each offering the same four room categories. Initialization only
//! writes into an empty store; restarting against a populated store leaves counts alone.

use guesthouse_core::eligibility::WOMEN_ONLY;
use guesthouse_core::{InventoryStore, Money, PropertyId, PropertySeed, Restriction, RoomSeed, StoreError};

/// Room categories offered by every starter property: `(label, price per night, units)`
pub const STARTER_ROOMS: [(&str, Money, u32); 4] = [
    ("Single AC", Money::from_major(1200), 5),
    ("Single Non-AC", Money::from_major(800), 10),
    ("Shared AC", Money::from_major(600), 8),
    ("Shared Non-AC", Money::from_major(400), 15),
];

/// The women-only starter property
pub const ANANDI_GOPAL: PropertyId = PropertyId::new(1);
/// The unrestricted common guest house
pub const COMMON_GUEST_HOUSE: PropertyId = PropertyId::new(2);
/// The second unrestricted guest house
pub const RAMANUJAN: PropertyId = PropertyId::new(3);

/// The starter set of properties and room categories.
#[must_use]
pub fn starter_set() -> Vec<PropertySeed> {
    [
        (ANANDI_GOPAL, "Dr. Anandi Gopal Guest House", Restriction::from(WOMEN_ONLY)),
        (COMMON_GUEST_HOUSE, "Common Guest House", Restriction::None),
        (RAMANUJAN, "S. Ramanujan Guest House", Restriction::None),
    ]
    .into_iter()
    .map(|(id, name, restriction)| PropertySeed {
        id,
        name: name.to_string(),
        restriction,
        rooms: STARTER_ROOMS
            .iter()
            .map(|(label, unit_price, count)| RoomSeed {
                label: (*label).to_string(),
                unit_price: *unit_price,
                count: *count,
            })
            .collect(),
    })
    .collect()
}

/// Provision `store` with `seed` unless it is already populated.
///
/// Returns `true` when the seed was written.
///
/// # Errors
///
/// Propagates [`StoreError`] from the store.
pub async fn initialize(store: &dyn InventoryStore, seed: &[PropertySeed]) -> Result<bool, StoreError> {
    let seeded = store.initialize(seed).await?;
    if seeded {
        tracing::info!(
            properties = seed.len(),
            room_categories = seed.iter().map(|p| p.rooms.len()).sum::<usize>(),
            "Inventory seeded"
        );
    } else {
        tracing::info!("Inventory already populated, skipping seed");
    }
    Ok(seeded)
}
