//! Repository for wallet balance state
//!
//! A wallet carries three independently tracked amounts: `balance` (the
//! rider's spendable funds), `cash_on_hand` (physical cash the admin actor
//! custodies), and `earnings` (accrued platform profit). Mutations happen
//! only through `apply_deltas` under a row lock taken inside the caller's
//! transaction, so concurrent operations on the same wallet serialize and
//! never lose updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::repos::user_repo;

/// Wallet model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub balance: Decimal,
    pub cash_on_hand: Decimal,
    pub earnings: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wallet joined with its owner's identity, for the collections worklist.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WalletWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub wallet: Wallet,
    pub owner_name: String,
    pub owner_mobile: String,
}

pub async fn find_by_user_id(pool: &PgPool, user_id: i64) -> Result<Option<Wallet>, sqlx::Error> {
    sqlx::query_as::<_, Wallet>(
        r#"
        SELECT id, user_id, balance, cash_on_hand, earnings, created_at, updated_at
        FROM wallets
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Lock the actor's wallet row for the remainder of the transaction,
/// provisioning a zeroed wallet (and a placeholder actor row) if absent.
///
/// Every ledger mutation goes through this first: the `FOR UPDATE` lock is
/// what serializes concurrent operations against the same wallet.
pub async fn lock_or_provision(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> Result<Wallet, sqlx::Error> {
    user_repo::ensure_actor(tx, user_id).await?;

    sqlx::query(
        r#"
        INSERT INTO wallets (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query_as::<_, Wallet>(
        r#"
        SELECT id, user_id, balance, cash_on_hand, earnings, created_at, updated_at
        FROM wallets
        WHERE user_id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}

/// Apply additive deltas to a locked wallet row and return the updated state.
///
/// Callers must hold the row lock from `lock_or_provision` in the same
/// transaction before applying deltas.
pub async fn apply_deltas(
    tx: &mut Transaction<'_, Postgres>,
    wallet_id: i64,
    balance_delta: Decimal,
    cash_on_hand_delta: Decimal,
    earnings_delta: Decimal,
) -> Result<Wallet, sqlx::Error> {
    sqlx::query_as::<_, Wallet>(
        r#"
        UPDATE wallets
        SET balance = balance + $2,
            cash_on_hand = cash_on_hand + $3,
            earnings = earnings + $4,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, balance, cash_on_hand, earnings, created_at, updated_at
        "#,
    )
    .bind(wallet_id)
    .bind(balance_delta)
    .bind(cash_on_hand_delta)
    .bind(earnings_delta)
    .fetch_one(&mut **tx)
    .await
}

/// Wallets at or below zero balance, joined with owner identity. Worklist
/// for chasing riders who owe the platform money.
pub async fn list_non_positive(pool: &PgPool) -> Result<Vec<WalletWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, WalletWithOwner>(
        r#"
        SELECT w.id, w.user_id, w.balance, w.cash_on_hand, w.earnings,
               w.created_at, w.updated_at,
               u.name AS owner_name, u.mobile AS owner_mobile
        FROM wallets w
        INNER JOIN users u ON u.id = w.user_id
        WHERE w.balance <= 0
        ORDER BY w.balance ASC
        "#,
    )
    .fetch_all(pool)
    .await
}
