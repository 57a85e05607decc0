//! # Guest House Runtime
//!
//! Runtime implementation of the booking flow defined in `guesthouse-core`.
//!
//! ## Core Components
//!
//! - **`InMemoryInventoryStore`**: inventory held in process, one mutex per room category
//! - **`QuoteBuilder`**: eligibility, validation and pricing, without touching inventory
//! - **`QuoteArena`**: pending reservations indexed by single-use token
//! - **`CommitCoordinator`**: the per-room critical section that decrements inventory
//! - **`BookingService`**: facade wiring the above together
//!
//! ## Example
//!
//! ```ignore
//! use guesthouse_runtime::{seed, BookingConfig, BookingService, InMemoryInventoryStore};
//!
//! let store = Arc::new(InMemoryInventoryStore::with_seed(&seed::starter_set()).await?);
//! let service = BookingService::new(
//!     store,
//!     identity,
//!     EligibilityPolicy::standard(),
//!     BookingConfig::default(),
//!     Arc::new(SystemClock),
//! );
//!
//! let quote = service.build_quote(&request).await?;
//! let reservation = service.commit(quote.token).await?;
//! ```

/// Quote arena with single-use tokens and expiry sweeping
pub mod arena;

/// Serialized inventory commits
pub mod commit;

/// Booking policy configuration
pub mod config;

/// Per-room lock table
pub mod locks;

/// Prometheus metrics for observability
pub mod metrics;

/// Quote construction
pub mod quote;

/// Starter inventory
pub mod seed;

/// Booking service facade
pub mod service;

/// In-memory inventory store
pub mod store;

pub use arena::QuoteArena;
pub use commit::CommitCoordinator;
pub use config::{BookingConfig, StayPolicy};
pub use locks::RoomLocks;
pub use quote::QuoteBuilder;
pub use service::BookingService;
pub use store::InMemoryInventoryStore;
