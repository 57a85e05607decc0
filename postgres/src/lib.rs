//! `PostgreSQL` inventory store for the guest house booking service.
//!
//! Implements [`InventoryStore`] over two tables, `properties` and `room_categories`.
//! The schema lives in `migrations/` and is applied by [`PostgresInventoryStore::migrate`].
//!
//! - Initialization runs in one transaction under an exclusive table lock, so concurrent
//!   boots seed at most once
//! - The decrement is a conditional `UPDATE ... WHERE available_count = $expected`; a
//!   `CHECK (available_count >= 0)` constraint backs it up
//!
//! # Example
//!
//! ```ignore
//! use guesthouse_postgres::PostgresInventoryStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresInventoryStore::new("postgres://localhost/guesthouse", 10).await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use guesthouse_core::{
    DecrementOutcome, InventoryStore, Money, Property, PropertyAvailability, PropertyId,
    PropertySeed, Restriction, RoomAvailability, RoomCategory, RoomCategoryId, RoomKey,
    StoreError, StoreFuture, validate_seed,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// One row of the `properties LEFT JOIN room_categories` listing.
type InventoryRow = (
    i32,
    String,
    Option<String>,
    Option<i32>,
    Option<String>,
    Option<i64>,
    Option<i32>,
);

/// Room row: `(id, property_id, label, unit_price_minor, available_count)`.
type RoomRow = (i32, i32, String, i64, i32);

const INVENTORY_QUERY: &str = "
    SELECT p.id, p.name, p.restriction, r.id, r.label, r.unit_price_minor, r.available_count
    FROM properties p
    LEFT JOIN room_categories r ON r.property_id = p.id
";

/// `PostgreSQL`-backed inventory store.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    /// Connect to `database_url` with a pool of at most `max_connections`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the connection fails.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the inventory tables if they don't already exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn seed(&self, seed: &[PropertySeed]) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(database("begin transaction"))?;

        sqlx::query("LOCK TABLE properties IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(database("lock properties"))?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties")
            .fetch_one(&mut *tx)
            .await
            .map_err(database("count properties"))?;
        if existing > 0 {
            return Ok(false);
        }

        for property in seed {
            let restriction = match &property.restriction {
                Restriction::None => None,
                Restriction::Category(category) => Some(category.as_str()),
            };
            sqlx::query("INSERT INTO properties (id, name, restriction) VALUES ($1, $2, $3)")
                .bind(to_db(property.id.value())?)
                .bind(&property.name)
                .bind(restriction)
                .execute(&mut *tx)
                .await
                .map_err(database("insert property"))?;

            for room in &property.rooms {
                sqlx::query(
                    "INSERT INTO room_categories (property_id, label, unit_price_minor, available_count)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(to_db(property.id.value())?)
                .bind(&room.label)
                .bind(i64::try_from(room.unit_price.minor()).map_err(|_| {
                    StoreError::InvalidSeed(format!("price of '{}' is out of range", room.label))
                })?)
                .bind(to_db(room.count)?)
                .execute(&mut *tx)
                .await
                .map_err(database("insert room category"))?;
            }
        }

        tx.commit().await.map_err(database("commit seed"))?;
        Ok(true)
    }

    async fn inventory(&self, id: Option<PropertyId>) -> Result<Vec<PropertyAvailability>, StoreError> {
        let rows: Vec<InventoryRow> = match id {
            Some(id) => {
                sqlx::query_as::<_, InventoryRow>(&format!("{INVENTORY_QUERY} WHERE p.id = $1 ORDER BY r.id"))
                    .bind(to_db(id.value())?)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, InventoryRow>(&format!("{INVENTORY_QUERY} ORDER BY p.id, r.id"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(database("load inventory"))?;

        let mut inventory: Vec<PropertyAvailability> = Vec::new();
        for (property_id, name, restriction, room_id, label, price, count) in rows {
            let property_id = PropertyId::new(from_db(property_id)?);
            if inventory.last().is_none_or(|last| last.property.id != property_id) {
                inventory.push(PropertyAvailability {
                    property: Property {
                        id: property_id,
                        name,
                        restriction: restriction.map_or(Restriction::None, Restriction::from),
                    },
                    rooms: Vec::new(),
                });
            }

            if let (Some(room_id), Some(label), Some(price), Some(count), Some(current)) =
                (room_id, label, price, count, inventory.last_mut())
            {
                current.rooms.push(RoomAvailability {
                    id: RoomCategoryId::new(from_db(room_id)?),
                    label,
                    unit_price: money(price)?,
                    available_count: from_db(count)?,
                });
            }
        }

        Ok(inventory)
    }

    async fn room(&self, key: &RoomKey) -> Result<Option<RoomCategory>, StoreError> {
        let row: Option<RoomRow> = sqlx::query_as(
            "SELECT id, property_id, label, unit_price_minor, available_count
             FROM room_categories WHERE property_id = $1 AND label = $2",
        )
        .bind(to_db(key.property_id.value())?)
        .bind(&key.label)
        .fetch_optional(&self.pool)
        .await
        .map_err(database("load room category"))?;

        row.map(|(id, property_id, label, price, count)| {
            Ok(RoomCategory {
                id: RoomCategoryId::new(from_db(id)?),
                property_id: PropertyId::new(from_db(property_id)?),
                label,
                unit_price: money(price)?,
                available_count: from_db(count)?,
            })
        })
        .transpose()
    }

    async fn decrement(&self, key: &RoomKey, expected: u32) -> Result<DecrementOutcome, StoreError> {
        let Ok(expected) = i32::try_from(expected) else {
            return Ok(DecrementOutcome::Stale);
        };
        if expected == 0 {
            return Ok(DecrementOutcome::Stale);
        }

        let remaining: Option<(i32,)> = sqlx::query_as(
            "UPDATE room_categories
             SET available_count = available_count - 1
             WHERE property_id = $1 AND label = $2 AND available_count = $3
             RETURNING available_count",
        )
        .bind(to_db(key.property_id.value())?)
        .bind(&key.label)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(database("decrement room category"))?;

        match remaining {
            Some((remaining,)) => Ok(DecrementOutcome::Applied {
                remaining: from_db(remaining)?,
            }),
            None if self.room(key).await?.is_some() => Ok(DecrementOutcome::Stale),
            None => Err(StoreError::Corrupt(format!("room {key} is not provisioned"))),
        }
    }
}

impl InventoryStore for PostgresInventoryStore {
    fn initialize<'a>(&'a self, seed: &'a [PropertySeed]) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            validate_seed(seed)?;
            let seeded = self.seed(seed).await?;
            tracing::debug!(seeded, "Postgres inventory initialization finished");
            Ok(seeded)
        })
    }

    fn list_inventory(&self) -> StoreFuture<'_, Vec<PropertyAvailability>> {
        Box::pin(self.inventory(None))
    }

    fn property_inventory(&self, id: PropertyId) -> StoreFuture<'_, Option<PropertyAvailability>> {
        Box::pin(async move { Ok(self.inventory(Some(id)).await?.into_iter().next()) })
    }

    fn get_property(&self, id: PropertyId) -> StoreFuture<'_, Option<Property>> {
        Box::pin(async move {
            let row: Option<(i32, String, Option<String>)> =
                sqlx::query_as("SELECT id, name, restriction FROM properties WHERE id = $1")
                    .bind(to_db(id.value())?)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(database("load property"))?;

            row.map(|(id, name, restriction)| {
                Ok(Property {
                    id: PropertyId::new(from_db(id)?),
                    name,
                    restriction: restriction.map_or(Restriction::None, Restriction::from),
                })
            })
            .transpose()
        })
    }

    fn get_room<'a>(&'a self, key: &'a RoomKey) -> StoreFuture<'a, Option<RoomCategory>> {
        Box::pin(self.room(key))
    }

    fn compare_and_decrement<'a>(
        &'a self,
        key: &'a RoomKey,
        expected: u32,
    ) -> StoreFuture<'a, DecrementOutcome> {
        Box::pin(self.decrement(key, expected))
    }
}

fn database(context: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |e| StoreError::Database(format!("Failed to {context}: {e}"))
}

fn to_db(value: u32) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::Database(format!("{value} does not fit in INTEGER")))
}

fn from_db(value: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative value {value}")))
}

fn money(minor: i64) -> Result<Money, StoreError> {
    u64::try_from(minor)
        .map(Money::from_minor)
        .map_err(|_| StoreError::Corrupt(format!("negative price {minor}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_reject_out_of_range_values() {
        assert_eq!(to_db(5), Ok(5));
        assert!(matches!(to_db(u32::MAX), Err(StoreError::Database(_))));
        assert_eq!(from_db(7), Ok(7));
        assert!(matches!(from_db(-1), Err(StoreError::Corrupt(_))));
        assert_eq!(money(120_000), Ok(Money::from_major(1200)));
        assert!(matches!(money(-5), Err(StoreError::Corrupt(_))));
    }
}
