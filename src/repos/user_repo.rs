//! Repository for actor (rider/admin) records
//!
//! Actors are referenced by id throughout the ledger; this repo owns
//! identity lookups, rider provisioning, and the placeholder actors created
//! when a wallet operation references an id with no user row yet.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use thiserror::Error;

pub const ROLE_RIDER: &str = "rider";
pub const ROLE_ADMIN: &str = "admin";

/// Actor model. Not serializable on purpose: the password hash must never
/// reach a response body, clients get `UserSummary` instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: String,
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal rider identity used by report joins.
#[derive(Debug, Clone, FromRow)]
pub struct RiderIdentity {
    pub id: i64,
    pub name: String,
}

/// Errors that can occur during user repository operations
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Mobile number already registered: {0}")]
    DuplicateMobile(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, mobile, email, password_hash, role, fcm_token, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_mobile(pool: &PgPool, mobile: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, mobile, email, password_hash, role, fcm_token, created_at, updated_at
        FROM users
        WHERE mobile = $1
        "#,
    )
    .bind(mobile)
    .fetch_optional(pool)
    .await
}

/// Insert a rider inside an open transaction
pub async fn insert_rider(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    mobile: &str,
    email: &str,
    password_hash: &str,
    fcm_token: Option<&str>,
) -> Result<User, UserError> {
    if mobile_taken(&mut **tx, mobile, None).await? {
        return Err(UserError::DuplicateMobile(mobile.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, mobile, email, password_hash, role, fcm_token)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, mobile, email, password_hash, role, fcm_token, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(mobile)
    .bind(email)
    .bind(password_hash)
    .bind(ROLE_RIDER)
    .bind(fcm_token)
    .fetch_one(&mut **tx)
    .await?;

    Ok(user)
}

/// Ensure an actor row exists for `user_id`, creating a placeholder rider if
/// absent. Wallet auto-provisioning calls this so a valid actor id never
/// trips the wallet FK.
pub async fn ensure_actor(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, mobile, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(format!("User {}", user_id))
    .bind(format!("user-{}", user_id))
    .bind(ROLE_RIDER)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Whitelist profile update; the password hash is touched only when a new
/// hash is supplied.
pub async fn update_profile(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    name: &str,
    mobile: &str,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<User, UserError> {
    if mobile_taken(&mut **tx, mobile, Some(id)).await? {
        return Err(UserError::DuplicateMobile(mobile.to_string()));
    }

    let user = match password_hash {
        Some(hash) => {
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET name = $2, mobile = $3, email = COALESCE($4, email),
                    password_hash = $5, updated_at = NOW()
                WHERE id = $1
                RETURNING id, name, mobile, email, password_hash, role, fcm_token, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(mobile)
            .bind(email)
            .bind(hash)
            .fetch_optional(&mut **tx)
            .await?
        }
        None => {
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET name = $2, mobile = $3, email = COALESCE($4, email), updated_at = NOW()
                WHERE id = $1
                RETURNING id, name, mobile, email, password_hash, role, fcm_token, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(mobile)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await?
        }
    };

    user.ok_or(UserError::NotFound(id))
}

/// All actors with role=rider, for the daily status report join.
pub async fn list_riders(pool: &PgPool) -> Result<Vec<RiderIdentity>, sqlx::Error> {
    sqlx::query_as::<_, RiderIdentity>(
        r#"
        SELECT id, name
        FROM users
        WHERE role = $1
        ORDER BY id
        "#,
    )
    .bind(ROLE_RIDER)
    .fetch_all(pool)
    .await
}

/// Find one rider by exact mobile, exact numeric id, or name substring.
pub async fn find_rider_by_query(
    pool: &PgPool,
    query: &str,
) -> Result<Option<User>, sqlx::Error> {
    let id_candidate: i64 = query.trim().parse().unwrap_or(0);

    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, mobile, email, password_hash, role, fcm_token, created_at, updated_at
        FROM users
        WHERE role = $1
          AND (mobile = $2 OR id = $3 OR name ILIKE '%' || $2 || '%')
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(ROLE_RIDER)
    .bind(query.trim())
    .bind(id_candidate)
    .fetch_optional(pool)
    .await
}

async fn mobile_taken<'e, E>(executor: E, mobile: &str, exclude_id: Option<i64>) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
            WHERE mobile = $1 AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(mobile)
    .bind(exclude_id)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_display() {
        let err = UserError::DuplicateMobile("0771234567".to_string());
        assert!(err.to_string().contains("0771234567"));

        let err = UserError::NotFound(42);
        assert!(err.to_string().contains("42"));
    }
}
