//! Rider account management
//!
//! Rider creation provisions the actor and a zeroed wallet in one
//! transaction. New riders get a generated `<mobile>@rider.fleet` email and
//! an initial password equal to their name (hashed); the profile endpoint
//! lets them change it later.

use sqlx::PgPool;
use thiserror::Error;

use crate::auth;
use crate::contracts::rider_v1::{CreateRiderRequest, UpdateProfileRequest};
use crate::repos::user_repo::{self, User, UserError};
use crate::repos::wallet_repo;
use crate::validation::{self, ValidationError};

#[derive(Debug, Error)]
pub enum RiderError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Mobile number already registered: {0}")]
    DuplicateMobile(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UserError> for RiderError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => RiderError::NotFound(id),
            UserError::DuplicateMobile(mobile) => RiderError::DuplicateMobile(mobile),
            UserError::Database(e) => RiderError::Database(e),
        }
    }
}

/// Create a rider actor with a zero-balance wallet, atomically.
pub async fn create_rider(pool: &PgPool, request: &CreateRiderRequest) -> Result<User, RiderError> {
    validation::validate_create_rider(request)?;

    let mobile = request.mobile.trim();
    let name = request.name.trim();
    let email = format!("{}@rider.fleet", mobile);
    let password_hash = auth::hash_password(name).map_err(RiderError::Hashing)?;

    let mut tx = pool.begin().await?;

    let rider = user_repo::insert_rider(
        &mut tx,
        name,
        mobile,
        &email,
        &password_hash,
        request.fcm_token.as_deref(),
    )
    .await?;

    sqlx::query("INSERT INTO wallets (user_id) VALUES ($1)")
        .bind(rider.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(rider_id = rider.id, mobile = %rider.mobile, "Rider created");

    Ok(rider)
}

/// Update identity fields; re-hash the password only when a new one was
/// supplied.
pub async fn update_profile(
    pool: &PgPool,
    request: &UpdateProfileRequest,
) -> Result<User, RiderError> {
    validation::validate_update_profile(request)?;

    let password_hash = match request.password.as_deref() {
        Some(password) => Some(auth::hash_password(password).map_err(RiderError::Hashing)?),
        None => None,
    };

    let mut tx = pool.begin().await?;

    let user = user_repo::update_profile(
        &mut tx,
        request.id,
        request.name.trim(),
        request.mobile.trim(),
        request.email.as_deref(),
        password_hash.as_deref(),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(user)
}

/// Look up a rider by mobile, id, or name fragment.
pub async fn find_rider(pool: &PgPool, query: &str) -> Result<Option<User>, RiderError> {
    if query.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    Ok(user_repo::find_rider_by_query(pool, query).await?)
}
