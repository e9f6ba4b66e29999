//! Repository for the wallet journal
//!
//! Append-only: entries are inserted inside the same transaction as the
//! balance mutation they record and are never updated or deleted. Each entry
//! snapshots the affected wallet's resulting tracked amount (`balance_after`)
//! so the audit trail stands on its own without replaying deltas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Journal entry kind. Stored as text with a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Recharge,
    Deduction,
    Withdraw,
    Refund,
    SheetEarnings,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recharge => "recharge",
            Self::Deduction => "deduction",
            Self::Withdraw => "withdraw",
            Self::Refund => "refund",
            Self::SheetEarnings => "sheet_earnings",
        }
    }
}

/// Journal entry (for reading from DB)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub wallet_id: i64,
    pub actor_id: Option<i64>,
    pub amount: Decimal,
    pub entry_type: String,
    pub description: Option<String>,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Append one journal entry inside an open transaction
#[allow(clippy::too_many_arguments)]
pub async fn insert_entry(
    tx: &mut Transaction<'_, Postgres>,
    entry_id: Uuid,
    wallet_id: i64,
    actor_id: Option<i64>,
    amount: Decimal,
    entry_type: EntryType,
    description: &str,
    balance_after: Decimal,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO wallet_transactions
            (id, wallet_id, actor_id, amount, entry_type, description, balance_after)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry_id)
    .bind(wallet_id)
    .bind(actor_id)
    .bind(amount)
    .bind(entry_type.as_str())
    .bind(description)
    .bind(balance_after)
    .execute(&mut **tx)
    .await?;

    Ok(entry_id)
}

/// Full journal for one wallet, newest entry first.
pub async fn list_for_wallet(
    pool: &PgPool,
    wallet_id: i64,
) -> Result<Vec<WalletTransaction>, sqlx::Error> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        SELECT id, wallet_id, actor_id, amount, entry_type, description, balance_after, created_at
        FROM wallet_transactions
        WHERE wallet_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(wallet_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_type_wire_names() {
        assert_eq!(EntryType::Recharge.as_str(), "recharge");
        assert_eq!(EntryType::Deduction.as_str(), "deduction");
        assert_eq!(EntryType::Withdraw.as_str(), "withdraw");
        assert_eq!(EntryType::Refund.as_str(), "refund");
        assert_eq!(EntryType::SheetEarnings.as_str(), "sheet_earnings");
    }
}
