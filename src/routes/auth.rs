//! Login endpoint
//!
//! Mobile + password against the stored Argon2 hash. Unknown mobile, absent
//! hash (placeholder actors), and wrong password all collapse into the same
//! 401 so the response does not reveal which part failed.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::auth::verify_password;
use crate::contracts::rider_v1::{LoginRequest, LoginResponse, UserSummary};
use crate::repos::user_repo;
use crate::routes::{ApiError, AppState};
use crate::validation::validate_login;

fn invalid_credentials() -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid credentials")
}

/// Handler for POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_login(&request).map_err(|e| ApiError::validation(e.to_string()))?;

    let user = user_repo::find_by_mobile(&state.pool, request.mobile.trim())
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(invalid_credentials)?;

    let stored_hash = user.password_hash.as_deref().ok_or_else(invalid_credentials)?;

    if !verify_password(&request.password, stored_hash) {
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserSummary::from(&user),
    }))
}
