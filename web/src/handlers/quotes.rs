//! Quote and commit endpoints.
//!
//! - POST /api/quotes - price a stay and hold it under a token
//! - POST /api/quotes/:token/commit - confirm a held quote

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use guesthouse_core::{CommittedReservation, IssuedQuote, QuoteRequest, QuoteToken};

/// Build a quote.
///
/// ```bash
/// curl -X POST http://localhost:10000/api/quotes \
///   -H 'content-type: application/json' \
///   -d '{"property_id":2,"room_label":"Single AC","guest_gender":"Male",
///        "guest_name":"Ada","arrival_date":"2025-01-10","departure_date":"2025-01-12"}'
/// ```
///
/// # Errors
///
/// 403 when ineligible, 404 for unknown property or room, 409 when sold out, 422 for
/// malformed input.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<(StatusCode, Json<IssuedQuote>), AppError> {
    let issued = state.service.build_quote(&request).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// Commit the quote held under `token`.
///
/// # Errors
///
/// 404 for an unknown or spent token, 409 when sold out, 410 when expired, 422 for a
/// malformed token.
pub async fn commit_quote(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<CommittedReservation>, AppError> {
    let token: QuoteToken = token
        .parse()
        .map_err(|_| AppError::validation(format!("'{token}' is not a quote token")))?;
    Ok(Json(state.service.commit(token).await?))
}
