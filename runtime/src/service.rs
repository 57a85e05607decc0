//! Booking service facade.
//!
//! Wires the quote builder, the quote arena and the commit coordinator around one
//! inventory store. This is the surface the HTTP layer talks to.

use crate::arena::QuoteArena;
use crate::commit::CommitCoordinator;
use crate::config::BookingConfig;
use crate::metrics;
use crate::quote::QuoteBuilder;
use guesthouse_core::{
    AuthError, AvailabilityReport, BookingError, Clock, CommittedReservation, EligibilityPolicy,
    GuestIdentity, IdentityProvider, InventoryStore, IssuedQuote, PropertyAvailability, PropertyId,
    QuoteRequest, QuoteToken,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Entry point for every booking operation
pub struct BookingService {
    store: Arc<dyn InventoryStore>,
    identity: Arc<dyn IdentityProvider>,
    quotes: QuoteBuilder,
    arena: Arc<QuoteArena>,
    coordinator: CommitCoordinator,
    config: BookingConfig,
}

impl BookingService {
    /// Creates a new `BookingService`
    #[must_use]
    pub fn new(
        store: Arc<dyn InventoryStore>,
        identity: Arc<dyn IdentityProvider>,
        eligibility: EligibilityPolicy,
        config: BookingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let quotes = QuoteBuilder::new(
            Arc::clone(&store),
            Arc::new(eligibility),
            config.pricing,
            config.stay_policy,
            config.quote_ttl,
            Arc::clone(&clock),
        );
        let arena = Arc::new(QuoteArena::new(Arc::clone(&clock)));
        let coordinator = CommitCoordinator::new(Arc::clone(&store), clock);

        Self {
            store,
            identity,
            quotes,
            arena,
            coordinator,
            config,
        }
    }

    /// The inventory store behind this service
    #[must_use]
    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.store
    }

    /// The booking configuration in effect
    #[must_use]
    pub const fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// Check a guest's credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on mismatch. The error does not say
    /// whether the id or the password was wrong.
    pub async fn verify_credentials(
        &self,
        id: &str,
        password: &str,
    ) -> Result<GuestIdentity, AuthError> {
        let result = self.identity.verify_credentials(id, password).await;
        match &result {
            Ok(guest) => tracing::info!(student_id = %guest.student_id, "Credentials verified"),
            Err(AuthError::InvalidCredentials) => tracing::info!("Credentials rejected"),
            Err(error) => tracing::error!(%error, "Identity provider failed"),
        }
        result
    }

    /// Every property with its room categories and live counts.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Store`] on backend failure.
    pub async fn list_availability(&self) -> Result<AvailabilityReport, BookingError> {
        let properties = self.store.list_inventory().await?;
        Ok(AvailabilityReport::new(properties))
    }

    /// One property with its room categories and live counts.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::PropertyNotFound`] for an unknown id.
    pub async fn get_property(&self, id: PropertyId) -> Result<PropertyAvailability, BookingError> {
        self.store
            .property_inventory(id)
            .await?
            .ok_or(BookingError::PropertyNotFound(id))
    }

    /// Validate and price a request, then hold it under a fresh token until commit or
    /// expiry. No inventory changes.
    ///
    /// # Errors
    ///
    /// See [`QuoteBuilder::build`].
    pub async fn build_quote(&self, request: &QuoteRequest) -> Result<IssuedQuote, BookingError> {
        let result = self.quotes.build(request).await;
        metrics::record_quote(metrics::outcome_label(&result));

        match result {
            Ok(pending) => {
                let issued = self.arena.insert(pending).await;
                tracing::info!(
                    token = %issued.token,
                    property_id = %issued.details.property_id,
                    room = %issued.details.room_label,
                    total = %issued.details.total_amount,
                    "Quote issued"
                );
                Ok(issued)
            }
            Err(error) => {
                tracing::info!(
                    property_id = %request.property_id,
                    room = %request.room_label,
                    %error,
                    "Quote refused"
                );
                Err(error)
            }
        }
    }

    /// Commit the quote held under `token`. The token is spent whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`BookingError::UnknownQuote`] for an unknown or already used token
    /// - [`BookingError::Expired`] if the quote's TTL has passed
    /// - [`BookingError::SoldOut`] if no unit is left
    pub async fn commit(&self, token: QuoteToken) -> Result<CommittedReservation, BookingError> {
        let started = Instant::now();
        let result = match self.arena.take(token).await {
            Some(pending) => self.coordinator.commit(pending).await,
            None => Err(BookingError::UnknownQuote(token)),
        };
        metrics::record_commit(metrics::outcome_label(&result), started.elapsed());
        result
    }

    /// Drop quotes whose TTL has passed. Returns how many were dropped.
    pub async fn purge_expired_quotes(&self) -> usize {
        self.arena.purge_expired().await
    }

    /// Number of quotes awaiting commit
    pub async fn pending_quotes(&self) -> usize {
        self.arena.len().await
    }

    /// Start the background task that purges expired quotes every
    /// `reaper_interval`. Abort the handle to stop it.
    #[must_use]
    pub fn spawn_quote_reaper(&self) -> JoinHandle<()> {
        tracing::debug!(interval = ?self.config.reaper_interval, "Starting quote reaper");
        Arc::clone(&self.arena).spawn_reaper(self.config.reaper_interval)
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
