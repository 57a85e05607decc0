//! Commit Coordinator: the only path that mutates inventory.
//!
//! ```text
//! commit(pending)
//!   ├─ expired?                       → Expired        (quote discarded)
//!   ├─ lock(property, room)           ← per-room, never global
//!   │    ├─ read available_count
//!   │    ├─ 0?                        → SoldOut        (quote discarded)
//!   │    └─ compare_and_decrement(n)  → Applied        → Committed
//!   │                                 → Stale          → re-read (another process won)
//!   └─ unlock
//! ```
//!
//! The in-process lock serializes commits on one category; the store's compare-and-swap
//! keeps the invariant when several processes share a durable store. A stale swap means
//! the count went down, so the re-read loop always terminates.

use crate::locks::RoomLocks;
use guesthouse_core::{
    BookingError, Clock, CommittedReservation, DecrementOutcome, InventoryStore,
    PendingReservation, ReservationId,
};
use std::sync::Arc;

/// Serializes and applies inventory commits
pub struct CommitCoordinator {
    store: Arc<dyn InventoryStore>,
    locks: RoomLocks,
    clock: Arc<dyn Clock>,
}

impl CommitCoordinator {
    /// Creates a new `CommitCoordinator`
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            locks: RoomLocks::new(),
            clock,
        }
    }

    /// Commit a pending reservation, decrementing its room category by exactly one.
    ///
    /// The reservation is consumed whatever the outcome; a rejected attempt needs a new
    /// quote.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Expired`] if the quote's TTL has passed
    /// - [`BookingError::SoldOut`] if the last unit went to someone else
    /// - [`BookingError::RoomNotFound`] if the category vanished from the store
    /// - [`BookingError::Store`] on backend failure
    pub async fn commit(
        &self,
        pending: PendingReservation,
    ) -> Result<CommittedReservation, BookingError> {
        if pending.is_expired(self.clock.now()) {
            tracing::warn!(token = %pending.token(), "Rejected expired quote");
            return Err(BookingError::Expired {
                token: pending.token(),
                expired_at: pending.expires_at(),
            });
        }

        let key = pending.details().room_key();
        let _guard = self.locks.acquire(&key).await;

        let remaining = loop {
            let room = self.store.get_room(&key).await?.ok_or_else(|| {
                BookingError::RoomNotFound {
                    property_id: key.property_id,
                    label: key.label.clone(),
                }
            })?;

            if room.available_count == 0 {
                tracing::warn!(room = %key, token = %pending.token(), "Sold out at commit");
                return Err(BookingError::SoldOut {
                    property_id: key.property_id,
                    label: key.label.clone(),
                });
            }

            match self
                .store
                .compare_and_decrement(&key, room.available_count)
                .await?
            {
                DecrementOutcome::Applied { remaining } => break remaining,
                DecrementOutcome::Stale => {
                    tracing::debug!(room = %key, "Inventory changed outside this process, re-reading");
                }
            }
        };

        let committed_at = self.clock.now();
        let held_ms = (committed_at - pending.issued_at()).num_milliseconds();
        let committed = CommittedReservation {
            reservation_id: ReservationId::new(),
            quote_token: pending.token(),
            committed_at,
            details: pending.into_details(),
        };

        tracing::info!(
            reservation_id = %committed.reservation_id,
            room = %key,
            remaining,
            held_ms,
            total = %committed.details.total_amount,
            "Reservation committed"
        );

        Ok(committed)
    }
}

impl std::fmt::Debug for CommitCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitCoordinator")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}
