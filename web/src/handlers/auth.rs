//! Student credential verification.
//!
//! - POST /api/auth/verify

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use guesthouse_core::GuestIdentity;
use serde::Deserialize;

/// Credentials posted by the sign-in form.
#[derive(Deserialize)]
pub struct VerifyRequest {
    /// Student id
    pub student_id: String,
    /// Password
    pub password: String,
}

/// Verify a student's credentials and return their identity.
///
/// ```bash
/// curl -X POST http://localhost:10000/api/auth/verify \
///   -H 'content-type: application/json' \
///   -d '{"student_id":"123456","password":"password123"}'
/// ```
///
/// # Errors
///
/// 401 on any mismatch.
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<GuestIdentity>, AppError> {
    let guest = state
        .service
        .verify_credentials(&request.student_id, &request.password)
        .await?;
    Ok(Json(guest))
}
