//! HTTP front end for the guest house booking service.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body, path)
//! 3. **Call** the matching `BookingService` operation
//! 4. **Map result** to an HTTP response, errors through [`AppError`]
//!
//! # Routes
//!
//! ```text
//! GET  /health
//! GET  /metrics
//! POST /api/auth/verify
//! GET  /api/availability
//! GET  /api/properties/:id
//! POST /api/quotes                   → 201
//! POST /api/quotes/:token/commit
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
