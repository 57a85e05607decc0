//! Seam to the identity layer.
//!
//! Credential verification is external to the booking core. The core only consumes the
//! `GuestIdentity` an implementation returns and trusts its fields.

use crate::types::GuestIdentity;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Credential verification failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown identifier or wrong password. The two cases are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The identity backend could not answer.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Verifies a student's credentials.
///
/// Returns `Pin<Box<dyn Future>>` so the provider can be held as `Arc<dyn IdentityProvider>`.
pub trait IdentityProvider: Send + Sync {
    /// Look up `id` and compare `password`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any mismatch.
    fn verify_credentials<'a>(
        &'a self,
        id: &'a str,
        password: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<GuestIdentity, AuthError>> + Send + 'a>>;
}
