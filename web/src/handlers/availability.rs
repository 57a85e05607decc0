//! Availability queries.
//!
//! - GET /api/availability - every property with live room counts
//! - GET /api/properties/:id - one property with live room counts

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use guesthouse_core::{AvailabilityReport, PropertyAvailability, PropertyId};

/// List every property and its room categories.
///
/// ```bash
/// curl http://localhost:10000/api/availability
/// ```
///
/// # Errors
///
/// 500 if the store fails.
pub async fn list_availability(
    State(state): State<AppState>,
) -> Result<Json<AvailabilityReport>, AppError> {
    Ok(Json(state.service.list_availability().await?))
}

/// One property and its room categories.
///
/// # Errors
///
/// 404 for an unknown property.
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<PropertyAvailability>, AppError> {
    Ok(Json(state.service.get_property(PropertyId::new(id)).await?))
}
