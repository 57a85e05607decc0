//! Prometheus metrics for the booking flow.
//!
//! - `guesthouse_quotes_total{outcome}`: quote attempts by outcome
//! - `guesthouse_commits_total{outcome}`: commit attempts by outcome
//! - `guesthouse_pending_quotes`: quotes issued and not yet committed or purged
//! - `guesthouse_commit_duration_seconds`: time spent in the commit critical section
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`MetricsExporter::install`] has installed a recorder.
//!
//! # Example
//!
//! ```rust,no_run
//! use guesthouse_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//!
//! // Serve this from a /metrics route
//! let body = exporter.render();
//! # Ok(())
//! # }
//! ```

use guesthouse_core::BookingError;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

/// Quote attempts by outcome
pub const QUOTES_TOTAL: &str = "guesthouse_quotes_total";
/// Commit attempts by outcome
pub const COMMITS_TOTAL: &str = "guesthouse_commits_total";
/// Quotes currently held in the arena
pub const PENDING_QUOTES: &str = "guesthouse_pending_quotes";
/// Commit latency
pub const COMMIT_DURATION_SECONDS: &str = "guesthouse_commit_duration_seconds";

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder plus the handle used to render it.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Create an exporter that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe the booking metrics and install the global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one recorder can be installed per process. A second call logs a warning and
    /// leaves this exporter without a handle.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if no recorder was installed by this exporter.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

impl std::fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

fn register_metrics() {
    describe_counter!(QUOTES_TOTAL, "Quote attempts by outcome");
    describe_counter!(COMMITS_TOTAL, "Commit attempts by outcome");
    describe_gauge!(
        PENDING_QUOTES,
        "Quotes issued and not yet committed or purged"
    );
    describe_histogram!(
        COMMIT_DURATION_SECONDS,
        "Time taken to commit a reservation"
    );
}

/// Label value for an attempt's outcome: `"ok"` or the error code in lower case.
#[must_use]
pub fn outcome_label<T>(result: &Result<T, BookingError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(error) => match error.kind() {
            guesthouse_core::ErrorKind::NotFound => "not_found",
            guesthouse_core::ErrorKind::Eligibility => "ineligible",
            guesthouse_core::ErrorKind::InvalidInput => "invalid_input",
            guesthouse_core::ErrorKind::SoldOut => "sold_out",
            guesthouse_core::ErrorKind::Auth => "auth",
            guesthouse_core::ErrorKind::Expired => "expired",
            guesthouse_core::ErrorKind::Internal => "internal",
        },
    }
}

/// Record a quote attempt.
pub fn record_quote(outcome: &'static str) {
    counter!(QUOTES_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a commit attempt and its latency.
pub fn record_commit(outcome: &'static str, duration: Duration) {
    counter!(COMMITS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(COMMIT_DURATION_SECONDS).record(duration.as_secs_f64());
}

/// Record the number of pending quotes.
#[allow(clippy::cast_precision_loss)]
pub fn set_pending_quotes(count: usize) {
    gauge!(PENDING_QUOTES).set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use guesthouse_core::{PropertyId, QuoteToken};

    #[test]
    fn test_exporter_starts_uninstalled() {
        let exporter = MetricsExporter::new();
        assert!(exporter.handle().is_none());
        assert!(exporter.render().is_none());
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut first = MetricsExporter::new();
        let mut second = MetricsExporter::new();
        assert!(first.install().is_ok());
        assert!(second.install().is_ok());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(&Ok::<(), BookingError>(())), "ok");
        assert_eq!(
            outcome_label::<()>(&Err(BookingError::PropertyNotFound(PropertyId::new(9)))),
            "not_found"
        );
        assert_eq!(
            outcome_label::<()>(&Err(BookingError::UnknownQuote(QuoteToken::new()))),
            "not_found"
        );
        assert_eq!(
            outcome_label::<()>(&Err(BookingError::SoldOut {
                property_id: PropertyId::new(2),
                label: "Single AC".to_string(),
            })),
            "sold_out"
        );
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        record_quote("ok");
        record_commit("sold_out", Duration::from_millis(3));
        set_pending_quotes(4);
    }
}
