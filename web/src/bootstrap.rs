//! Process start-up: tracing, store selection, seeding and service wiring.

use crate::config::Config;
use crate::state::AppState;
use anyhow::Context;
use guesthouse_auth::StudentDirectory;
use guesthouse_core::{EligibilityPolicy, InventoryStore, SystemClock};
use guesthouse_postgres::PostgresInventoryStore;
use guesthouse_runtime::metrics::MetricsExporter;
use guesthouse_runtime::{seed, BookingService, InMemoryInventoryStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,guesthouse=debug,sqlx=warn";

/// Install the global tracing subscriber.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the configured store and make sure it holds the starter set.
///
/// # Errors
///
/// Fails if the database is unreachable, migrations fail or seeding fails.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn InventoryStore>> {
    let store: Arc<dyn InventoryStore> = match &config.database {
        Some(database) => {
            let store = PostgresInventoryStore::new(&database.url, database.max_connections)
                .await
                .context("connecting to PostgreSQL")?;
            store.migrate().await.context("running migrations")?;
            tracing::info!(max_connections = database.max_connections, "Using PostgreSQL inventory store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory inventory store");
            Arc::new(InMemoryInventoryStore::new())
        }
    };

    seed::initialize(store.as_ref(), &seed::starter_set())
        .await
        .context("seeding inventory")?;
    Ok(store)
}

/// Build the shared application state.
///
/// # Errors
///
/// Fails if the store cannot be opened or the metrics recorder cannot be installed.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store = open_store(config).await?;
    let service = BookingService::new(
        store,
        Arc::new(StudentDirectory::seeded()),
        EligibilityPolicy::standard(),
        config.booking.booking_config(),
        Arc::new(SystemClock),
    );

    let mut state = AppState::new(Arc::new(service));
    if config.metrics_enabled {
        let mut exporter = MetricsExporter::new();
        exporter.install().context("installing metrics recorder")?;
        state = state.with_metrics(Arc::new(exporter));
    }
    Ok(state)
}
