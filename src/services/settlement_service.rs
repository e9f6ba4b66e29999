//! Sheet settlement (approve flow)
//!
//! The one place the sheet store and the wallet ledger are coupled. The
//! whole approval is a single transaction: pending-status guard, rider
//! debit, treasury credit, the two-sided journal, and the status flip either
//! all commit or none do.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::repos::sheet_repo;
use crate::repos::transaction_repo::{self, EntryType};
use crate::repos::wallet_repo;

/// Errors that can occur during sheet settlement
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(Uuid),

    /// Approval is a one-time transition; the second call fails here.
    #[error("Sheet already processed: {0}")]
    AlreadyProcessed(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a successful settlement, for logging and notification.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub sheet_id: Uuid,
    pub rider_id: i64,
    pub delivery_date: NaiveDate,
    pub amount: Decimal,
    pub rider_balance_after: Decimal,
    pub treasury_earnings_after: Decimal,
}

/// Approve a pending sheet, converting its computed commission into an
/// actual wallet debit/credit pair.
///
/// The deducted amount is the sheet's `admin_commission` as computed at
/// submission time; it is not recomputed here. The rider's balance may go
/// negative; the sheet records what the rider owes from that day's cash
/// regardless of current balance.
pub async fn approve_sheet(
    pool: &PgPool,
    treasury_user_id: i64,
    sheet_id: Uuid,
) -> Result<Settlement, SettlementError> {
    let mut tx = pool.begin().await?;

    let sheet = sheet_repo::lock_by_id(&mut tx, sheet_id)
        .await?
        .ok_or(SettlementError::SheetNotFound(sheet_id))?;

    if !sheet.is_pending() {
        return Err(SettlementError::AlreadyProcessed(sheet_id));
    }

    let amount = sheet.admin_commission;

    let rider_wallet = wallet_repo::lock_or_provision(&mut tx, sheet.rider_id).await?;
    let rider_wallet =
        wallet_repo::apply_deltas(&mut tx, rider_wallet.id, -amount, Decimal::ZERO, Decimal::ZERO)
            .await?;

    transaction_repo::insert_entry(
        &mut tx,
        Uuid::new_v4(),
        rider_wallet.id,
        Some(treasury_user_id),
        -amount,
        EntryType::Deduction,
        &format!("Daily sheet settlement: {}", sheet.delivery_date),
        rider_wallet.balance,
    )
    .await?;

    let treasury_wallet = wallet_repo::lock_or_provision(&mut tx, treasury_user_id).await?;
    let treasury_wallet =
        wallet_repo::apply_deltas(&mut tx, treasury_wallet.id, Decimal::ZERO, Decimal::ZERO, amount)
            .await?;

    transaction_repo::insert_entry(
        &mut tx,
        Uuid::new_v4(),
        treasury_wallet.id,
        Some(treasury_user_id),
        amount,
        EntryType::SheetEarnings,
        &format!(
            "Commission from rider {} sheet {}",
            sheet.rider_id, sheet.delivery_date
        ),
        treasury_wallet.earnings,
    )
    .await?;

    sheet_repo::mark_approved(&mut tx, sheet_id).await?;

    tx.commit().await?;

    tracing::info!(
        sheet_id = %sheet_id,
        rider_id = sheet.rider_id,
        date = %sheet.delivery_date,
        amount = %amount,
        rider_balance_after = %rider_wallet.balance,
        "Sheet approved and settled"
    );

    Ok(Settlement {
        sheet_id,
        rider_id: sheet.rider_id,
        delivery_date: sheet.delivery_date,
        amount,
        rider_balance_after: rider_wallet.balance,
        treasury_earnings_after: treasury_wallet.earnings,
    })
}
