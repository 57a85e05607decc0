//! In-memory student directory.
//!
//! # Security
//!
//! - **Digest storage**: plaintext passwords are dropped as soon as they are hashed
//! - **Constant-time validation**: digests are compared with `constant_time_eq`
//! - **Uniform failure**: unknown ids still go through a digest comparison, and both
//!   failures surface as [`AuthError::InvalidCredentials`]

use crate::{TEST_STUDENT_ID, TEST_STUDENT_PASSWORD};
use guesthouse_core::{AuthError, Gender, GuestIdentity, IdentityProvider};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

type PasswordDigest = [u8; 32];

/// Errors raised while building a directory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Two records share a student id
    #[error("Duplicate student id: {0}")]
    DuplicateStudent(String),

    /// A record has an empty student id or password
    #[error("Incomplete record for student '{0}'")]
    IncompleteRecord(String),
}

/// One roster entry as loaded from configuration or a fixture file
#[derive(Clone, Deserialize)]
pub struct StudentCredentials {
    /// Identity returned on successful verification
    #[serde(flatten)]
    pub identity: GuestIdentity,
    /// Plaintext password, hashed on load
    pub password: String,
}

impl std::fmt::Debug for StudentCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudentCredentials")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
struct StudentRecord {
    identity: GuestIdentity,
    password_digest: PasswordDigest,
}

/// Roster of students allowed to book, keyed by student id
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    students: HashMap<String, StudentRecord>,
}

impl StudentDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding only the test student (`123456` / `password123`).
    #[must_use]
    pub fn seeded() -> Self {
        Self::new().with_student(test_student(), TEST_STUDENT_PASSWORD)
    }

    /// Add or replace a student.
    #[must_use]
    pub fn with_student(mut self, identity: GuestIdentity, password: &str) -> Self {
        self.students.insert(
            identity.student_id.clone(),
            StudentRecord {
                identity,
                password_digest: digest(password),
            },
        );
        self
    }

    /// Build a directory from roster records.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateStudent`] if two records share an id and
    /// [`DirectoryError::IncompleteRecord`] for a blank id or password.
    pub fn from_credentials(
        records: impl IntoIterator<Item = StudentCredentials>,
    ) -> Result<Self, DirectoryError> {
        let mut directory = Self::new();
        for StudentCredentials { identity, password } in records {
            let student_id = identity.student_id.trim().to_string();
            if student_id.is_empty() || password.is_empty() {
                return Err(DirectoryError::IncompleteRecord(student_id));
            }
            if directory.students.contains_key(&student_id) {
                return Err(DirectoryError::DuplicateStudent(student_id));
            }
            directory = directory.with_student(
                GuestIdentity {
                    student_id,
                    ..identity
                },
                &password,
            );
        }
        Ok(directory)
    }

    /// Number of students on the roster
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// True when the roster is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn verify(&self, id: &str, password: &str) -> Result<GuestIdentity, AuthError> {
        let presented = digest(password);
        match self.students.get(id.trim()) {
            Some(record) if constant_time_eq::constant_time_eq(&presented, &record.password_digest) => {
                Ok(record.identity.clone())
            }
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                // Same amount of work as a wrong password.
                let _ = constant_time_eq::constant_time_eq(&presented, &[0_u8; 32]);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

impl IdentityProvider for StudentDirectory {
    fn verify_credentials<'a>(
        &'a self,
        id: &'a str,
        password: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<GuestIdentity, AuthError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.verify(id, password);
            if result.is_err() {
                tracing::debug!("Credential check failed");
            }
            result
        })
    }
}

fn digest(password: &str) -> PasswordDigest {
    Sha256::digest(password.as_bytes()).into()
}

fn test_student() -> GuestIdentity {
    GuestIdentity {
        student_id: TEST_STUDENT_ID.to_string(),
        enrollment_no: "BT21CME007".to_string(),
        name: "Cristiano Ronaldo".to_string(),
        gender: Gender::Male,
        email: "CR7@vnit.ac.in".to_string(),
        phone: "9856543210".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn student(id: &str, gender: Gender) -> GuestIdentity {
        GuestIdentity {
            student_id: id.to_string(),
            enrollment_no: format!("BT21CSE{id}"),
            name: "Ada Lovelace".to_string(),
            gender,
            email: "ada@example.edu".to_string(),
            phone: "9000000000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seeded_student_verifies() {
        let directory = StudentDirectory::seeded();
        let guest = directory
            .verify_credentials(TEST_STUDENT_ID, TEST_STUDENT_PASSWORD)
            .await
            .unwrap();

        assert_eq!(guest.name, "Cristiano Ronaldo");
        assert_eq!(guest.enrollment_no, "BT21CME007");
        assert_eq!(guest.gender, Gender::Male);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_id_look_the_same() {
        let directory = StudentDirectory::seeded();

        let wrong_password = directory.verify_credentials(TEST_STUDENT_ID, "password124").await;
        let unknown_id = directory.verify_credentials("654321", TEST_STUDENT_PASSWORD).await;

        assert_eq!(wrong_password, Err(AuthError::InvalidCredentials));
        assert_eq!(unknown_id, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_id_is_trimmed() {
        let directory = StudentDirectory::seeded();
        assert!(directory.verify_credentials(" 123456 ", TEST_STUDENT_PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_password_is_exact() {
        let directory = StudentDirectory::seeded();
        assert!(directory.verify_credentials(TEST_STUDENT_ID, " password123").await.is_err());
        assert!(directory.verify_credentials(TEST_STUDENT_ID, "PASSWORD123").await.is_err());
    }

    #[test]
    fn test_from_credentials_rejects_duplicates() {
        let records = vec![
            StudentCredentials {
                identity: student("100001", Gender::Female),
                password: "a".to_string(),
            },
            StudentCredentials {
                identity: student("100001", Gender::Male),
                password: "b".to_string(),
            },
        ];
        assert_eq!(
            StudentDirectory::from_credentials(records).unwrap_err(),
            DirectoryError::DuplicateStudent("100001".to_string())
        );
    }

    #[test]
    fn test_from_credentials_rejects_blank_password() {
        let records = vec![StudentCredentials {
            identity: student("100002", Gender::Female),
            password: String::new(),
        }];
        assert!(matches!(
            StudentDirectory::from_credentials(records),
            Err(DirectoryError::IncompleteRecord(_))
        ));
    }

    #[tokio::test]
    async fn test_roster_loads_from_json() {
        let json = r#"[{
            "student_id": "200001",
            "enrollment_no": "BT22ECE011",
            "name": "Anandi Joshi",
            "gender": "Female",
            "email": "anandi@example.edu",
            "phone": "9111111111",
            "password": "s3cret"
        }]"#;
        let records: Vec<StudentCredentials> = serde_json::from_str(json).unwrap();
        let directory = StudentDirectory::from_credentials(records).unwrap();

        assert_eq!(directory.len(), 1);
        let guest = directory.verify_credentials("200001", "s3cret").await.unwrap();
        assert_eq!(guest.gender, Gender::Female);
    }

    #[test]
    fn test_debug_redacts_password() {
        let record = StudentCredentials {
            identity: student("100003", Gender::Other),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{record:?}").contains("hunter2"));
    }
}
