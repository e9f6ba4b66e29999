//! Rider/Actor V1 Contract Types

use serde::{Deserialize, Serialize};

use crate::repos::user_repo::User;

/// POST /api/login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub mobile: String,
    pub password: String,
}

/// Identity fields exposed to clients. Password hashes never leave the
/// repo layer.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub mobile: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role.clone(),
            mobile: user.mobile.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

/// POST /api/create_rider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateRiderRequest {
    pub name: String,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRiderResponse {
    pub message: String,
    pub rider: UserSummary,
}

/// POST /api/riders/profile: whitelist update of identity fields; the
/// password is re-hashed only when a new one is supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProfileRequest {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// POST /api/find-rider: match by exact mobile, exact id, or name substring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindRiderRequest {
    pub query_input: String,
}
