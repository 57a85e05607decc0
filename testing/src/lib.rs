//! # Guest House Testing
//!
//! Testing utilities and fixtures for the booking workspace.
//!
//! This crate provides:
//! - Deterministic clocks implementing [`Clock`]
//! - Fixtures that build seeded stores and services
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use guesthouse_testing::{fixtures, test_clock};
//!
//! #[tokio::test]
//! async fn test_quote_then_commit() {
//!     let service = fixtures::booking_service(Arc::new(test_clock())).await;
//!     let quote = service.build_quote(&fixtures::quote_request(2, "Single AC", "Male")).await?;
//!     service.commit(quote.token).await?;
//! }
//! ```

use chrono::{DateTime, Utc};
use guesthouse_core::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::TimeDelta;
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use guesthouse_testing::mocks::FixedClock;
    /// use guesthouse_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2);
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Used to push quotes past their expiry without sleeping.
    ///
    /// # Example
    ///
    /// ```
    /// use guesthouse_testing::mocks::ManualClock;
    /// use guesthouse_core::Clock;
    /// use chrono::{TimeDelta, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = ManualClock::new(start);
    /// clock.advance(TimeDelta::minutes(16));
    /// assert_eq!(clock.now(), start + TimeDelta::minutes(16));
    /// ```
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward by `delta`
        pub fn advance(&self, delta: TimeDelta) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += delta;
        }

        /// Jump to `time`
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Seeded stores, services and requests.
pub mod fixtures {
    use guesthouse_auth::StudentDirectory;
    use guesthouse_core::{
        Clock, EligibilityPolicy, InventoryStore, Money, PropertyId, PropertySeed, QuoteRequest,
        Restriction, RoomKey, RoomSeed,
    };
    use guesthouse_runtime::{seed, BookingConfig, BookingService, InMemoryInventoryStore};
    use std::sync::Arc;

    /// Arrival date used by [`quote_request`]
    pub const ARRIVAL: &str = "2025-01-10";
    /// Departure date used by [`quote_request`], two nights after [`ARRIVAL`]
    pub const DEPARTURE: &str = "2025-01-12";

    /// In-memory store holding the starter set.
    ///
    /// # Panics
    ///
    /// Panics if the starter set fails validation.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub async fn seeded_store() -> Arc<InMemoryInventoryStore> {
        Arc::new(
            InMemoryInventoryStore::with_seed(&seed::starter_set())
                .await
                .expect("starter set is valid"),
        )
    }

    /// In-memory store with one unrestricted property holding `count` units of a single
    /// "Single AC" category at 1200.00.
    ///
    /// # Panics
    ///
    /// Panics if the seed fails validation.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub async fn single_room_store(count: u32) -> Arc<InMemoryInventoryStore> {
        let seed = [PropertySeed {
            id: seed::COMMON_GUEST_HOUSE,
            name: "Common Guest House".to_string(),
            restriction: Restriction::None,
            rooms: vec![RoomSeed {
                label: "Single AC".to_string(),
                unit_price: Money::from_major(1200),
                count,
            }],
        }];
        Arc::new(
            InMemoryInventoryStore::with_seed(&seed)
                .await
                .expect("single room seed is valid"),
        )
    }

    /// Service over `store` with the seeded student directory and default config.
    #[must_use]
    pub fn service_over(
        store: Arc<dyn InventoryStore>,
        config: BookingConfig,
        clock: Arc<dyn Clock>,
    ) -> BookingService {
        BookingService::new(
            store,
            Arc::new(StudentDirectory::seeded()),
            EligibilityPolicy::standard(),
            config,
            clock,
        )
    }

    /// Service over the starter set with default config.
    pub async fn booking_service(clock: Arc<dyn Clock>) -> BookingService {
        service_over(seeded_store().await, BookingConfig::default(), clock)
    }

    /// Request for `room_label` at `property_id`, from [`ARRIVAL`] to [`DEPARTURE`].
    #[must_use]
    pub fn quote_request(property_id: u32, room_label: &str, gender: &str) -> QuoteRequest {
        QuoteRequest {
            property_id: PropertyId::new(property_id),
            room_label: room_label.to_string(),
            guest_gender: gender.to_string(),
            guest_name: "Test Guest".to_string(),
            arrival_date: ARRIVAL.to_string(),
            departure_date: DEPARTURE.to_string(),
        }
    }

    /// Current count of one room category, or `None` if it does not exist.
    pub async fn available(store: &dyn InventoryStore, property_id: u32, label: &str) -> Option<u32> {
        store
            .get_room(&RoomKey::new(PropertyId::new(property_id), label))
            .await
            .ok()
            .flatten()
            .map(|room| room.available_count)
    }

    /// Install a test subscriber honouring `RUST_LOG`. Safe to call more than once.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use chrono::{NaiveDate, TimeDelta};
    use guesthouse_core::Gender;
    use proptest::prelude::*;

    /// Any gender
    pub fn gender() -> impl Strategy<Value = Gender> {
        prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
    }

    /// Spellings the booking form may send for a gender, in any case
    pub fn gender_spelling() -> impl Strategy<Value = (Gender, String)> {
        (gender(), any::<bool>()).prop_map(|(gender, upper)| {
            let spelling = if upper {
                gender.as_str().to_ascii_uppercase()
            } else {
                gender.as_str().to_ascii_lowercase()
            };
            (gender, spelling)
        })
    }

    /// Arrival and departure dates `-30..=60` nights apart, in 2025
    pub fn stay() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
        (0_i64..365, -30_i64..=60).prop_filter_map("date in range", |(offset, nights)| {
            let start = NaiveDate::from_ymd_opt(2025, 1, 1)?;
            let arrival = start.checked_add_signed(TimeDelta::days(offset))?;
            let departure = arrival.checked_add_signed(TimeDelta::days(nights))?;
            Some((arrival, departure))
        })
    }
}

pub use mocks::{FixedClock, ManualClock, test_clock};
