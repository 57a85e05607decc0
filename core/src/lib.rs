//! # Guest House Core
//!
//! Domain types and pure policies for guest-house room reservations.
//!
//! This crate holds everything about a booking that can be decided without I/O:
//!
//! - **Types**: properties, room categories, guests, quotes and committed reservations
//! - **Eligibility Policy**: table-driven check of a property's restriction against a guest
//! - **Pricing Engine**: exact, fixed-point computation of a stay's total charge
//! - **Environment**: the `Clock`, `InventoryStore` and `IdentityProvider` seams that the
//!   runtime and adapters implement
//!
//! ## Reservation Lifecycle
//!
//! ```text
//! QuoteRequest ──► Eligibility ──► Pricing ──► PendingReservation (no lock held)
//!                                                     │
//!                                         commit (per-room critical section)
//!                                                     │
//!                               ┌─────────────────────┼───────────────────────┐
//!                               ▼                     ▼                       ▼
//!                          Committed          Rejected(SoldOut)       Rejected(Invalid)
//! ```
//!
//! Terminal states are final. A rejected attempt needs a brand new quote.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod eligibility;
pub mod environment;
pub mod error;
pub mod identity;
pub mod pricing;
pub mod store;
pub mod types;

pub use eligibility::EligibilityPolicy;
pub use environment::{Clock, SystemClock};
pub use error::{BookingError, ErrorKind, StoreError};
pub use identity::{AuthError, IdentityProvider};
pub use pricing::{PriceBreakdown, PricingPolicy, TaxRate};
pub use store::{validate_seed, DecrementOutcome, InventoryStore, StoreFuture};
pub use types::*;
