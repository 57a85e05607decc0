//! # Guest House Authentication
//!
//! Credential verification for students booking a guest house.
//!
//! [`StudentDirectory`] is an in-memory roster implementing
//! [`guesthouse_core::IdentityProvider`]. Passwords are kept as SHA-256 digests and
//! compared in constant time.
//!
//! ## Example
//!
//! ```rust
//! use guesthouse_auth::StudentDirectory;
//! use guesthouse_core::IdentityProvider;
//!
//! # async fn example() {
//! let directory = StudentDirectory::seeded();
//! let guest = directory.verify_credentials("123456", "password123").await;
//! assert!(guest.is_ok());
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod directory;

pub use directory::{DirectoryError, StudentCredentials, StudentDirectory};

/// Student id of the account present in every seeded directory
pub const TEST_STUDENT_ID: &str = "123456";

/// Password of the account present in every seeded directory
pub const TEST_STUDENT_PASSWORD: &str = "password123";
