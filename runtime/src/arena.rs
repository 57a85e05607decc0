//! Arena of pending reservations, indexed by quote token.
//!
//! Replaces per-session storage of the quote being paid for. Entries are single use: the
//! only way to get one back out is [`QuoteArena::take`], which removes it. Expired entries
//! are swept by [`QuoteArena::purge_expired`], usually from a background reaper task.

use guesthouse_core::{Clock, IssuedQuote, PendingReservation, QuoteToken};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Token-indexed store of quotes awaiting confirmation
pub struct QuoteArena {
    entries: Mutex<HashMap<QuoteToken, PendingReservation>>,
    clock: Arc<dyn Clock>,
}

impl QuoteArena {
    /// Creates an empty arena
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Stores a pending reservation and returns its caller-facing view.
    pub async fn insert(&self, pending: PendingReservation) -> IssuedQuote {
        let issued = pending.issued();
        let mut entries = self.entries.lock().await;
        entries.insert(pending.token(), pending);
        crate::metrics::set_pending_quotes(entries.len());
        issued
    }

    /// Removes and returns the reservation for `token`.
    ///
    /// Returns `None` for unknown tokens and for tokens already taken. Expiry is not
    /// checked here; an expired entry is still handed back so the caller can report it.
    pub async fn take(&self, token: QuoteToken) -> Option<PendingReservation> {
        let mut entries = self.entries.lock().await;
        let pending = entries.remove(&token);
        crate::metrics::set_pending_quotes(entries.len());
        pending
    }

    /// Drops every entry whose expiry has passed. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, pending| !pending.is_expired(now));
        let purged = before - entries.len();
        crate::metrics::set_pending_quotes(entries.len());

        if purged > 0 {
            tracing::debug!(purged, remaining = entries.len(), "Expired quotes purged");
        }
        purged
    }

    /// Number of quotes currently held
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when no quotes are held
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Spawns a task that calls [`purge_expired`](Self::purge_expired) every `interval`.
    ///
    /// The task runs until aborted through the returned handle.
    #[must_use]
    pub fn spawn_reaper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.purge_expired().await;
            }
        })
    }
}

impl std::fmt::Debug for QuoteArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteArena").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, Utc};
    use guesthouse_core::{Gender, Money, PropertyId, QuoteDetails};
    use guesthouse_testing::ManualClock;

    fn details() -> QuoteDetails {
        let day = NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date");
        QuoteDetails {
            property_id: PropertyId::new(2),
            property_name: "Common Guest House".to_string(),
            room_label: "Single AC".to_string(),
            guest_name: "Ada".to_string(),
            guest_gender: Gender::Female,
            arrival_date: day,
            departure_date: day,
            night_count: 1,
            unit_price: Money::from_major(1200),
            base_amount: Money::from_major(1200),
            tax_amount: Money::from_major(144),
            surcharge: Money::from_major(50),
            total_amount: Money::from_major(1394),
        }
    }

    fn pending(clock: &ManualClock, ttl_minutes: i64) -> PendingReservation {
        let now = clock.now();
        PendingReservation::new(details(), now, now + TimeDelta::minutes(ttl_minutes))
    }

    #[tokio::test]
    async fn test_take_is_single_use() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let arena = QuoteArena::new(clock.clone());

        let issued = arena.insert(pending(&clock, 15)).await;
        assert_eq!(arena.len().await, 1);

        let first = arena.take(issued.token).await;
        assert_eq!(first.map(|p| p.token()), Some(issued.token));
        assert!(arena.take(issued.token).await.is_none());
        assert!(arena.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired_entries() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let arena = QuoteArena::new(clock.clone());

        let short = arena.insert(pending(&clock, 5)).await;
        let long = arena.insert(pending(&clock, 30)).await;

        clock.advance(TimeDelta::minutes(10));
        assert_eq!(arena.purge_expired().await, 1);
        assert!(arena.take(short.token).await.is_none());
        assert!(arena.take(long.token).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_sweeps_in_background() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let arena = Arc::new(QuoteArena::new(clock.clone()));
        arena.insert(pending(&clock, 1)).await;

        clock.advance(TimeDelta::minutes(2));
        let reaper = Arc::clone(&arena).spawn_reaper(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(arena.is_empty().await);
        reaper.abort();
    }
}
