//! Rider account endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::contracts::rider_v1::{
    CreateRiderRequest, CreateRiderResponse, FindRiderRequest, UpdateProfileRequest, UserSummary,
};
use crate::routes::{ApiError, AppState};
use crate::services::rider_service::{self, RiderError};

/// Map service errors to HTTP responses
fn map_error(error: RiderError) -> ApiError {
    match error {
        RiderError::Validation(e) => ApiError::validation(e.to_string()),
        RiderError::DuplicateMobile(_) => ApiError::validation(error.to_string()),
        RiderError::NotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
        }
        RiderError::Hashing(e) => ApiError::internal(e),
        RiderError::Database(e) => ApiError::internal(e),
    }
}

/// Handler for POST /api/create_rider
pub async fn create_rider(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRiderRequest>,
) -> Result<Json<CreateRiderResponse>, ApiError> {
    let rider = rider_service::create_rider(&state.pool, &request)
        .await
        .map_err(map_error)?;

    Ok(Json(CreateRiderResponse {
        message: "Rider created successfully".to_string(),
        rider: UserSummary::from(&rider),
    }))
}

/// Handler for POST /api/riders/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = rider_service::update_profile(&state.pool, &request)
        .await
        .map_err(map_error)?;

    Ok(Json(UserSummary::from(&user)))
}

/// Handler for POST /api/find-rider
pub async fn find_rider(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FindRiderRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = rider_service::find_rider(&state.pool, &request.query_input)
        .await
        .map_err(map_error)?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Rider not found"))?;

    Ok(Json(UserSummary::from(&user)))
}
