//! Application state shared across all HTTP handlers.

use guesthouse_runtime::BookingService;
use guesthouse_runtime::metrics::MetricsExporter;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Booking operations
    pub service: Arc<BookingService>,
    /// Prometheus exporter, when metrics are enabled
    pub metrics: Option<Arc<MetricsExporter>>,
}

impl AppState {
    /// Create state around `service` with metrics disabled.
    #[must_use]
    pub const fn new(service: Arc<BookingService>) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// Attach a metrics exporter.
    ///
    /// An exporter without a recorder handle cannot serve `/metrics`; it is dropped with
    /// an error log and metrics stay disabled.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsExporter>) -> Self {
        if metrics.handle().is_some() {
            self.metrics = Some(metrics);
        } else {
            tracing::error!(
                "Metrics enabled but another recorder owns the process; /metrics will answer 404"
            );
        }
        self
    }
}
