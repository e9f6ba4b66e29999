//! Wallet ledger operations
//!
//! Each operation runs in a single transaction: lock every wallet it will
//! mutate, re-read state under the lock, apply deltas, and append exactly
//! one journal entry per affected wallet side. Any failure rolls the whole
//! operation back; a journal entry is never committed without its balance
//! mutation or vice versa.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::contracts::wallet_ops_v1::{DeductRequest, RechargeRequest, RefundRequest};
use crate::repos::transaction_repo::{self, EntryType, WalletTransaction};
use crate::repos::wallet_repo::{self, Wallet};
use crate::validation::{self, ValidationError};

/// Errors that can occur during wallet ledger operations
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Recoverable: the caller may resubmit with force=true to allow the
    /// balance to go negative.
    #[error("Rider {rider_id} balance {balance} cannot cover {amount}; confirmation required")]
    ConfirmLowBalance {
        rider_id: i64,
        balance: Decimal,
        amount: Decimal,
    },

    #[error("Not enough earnings: accrued {available}, requested {requested}")]
    InsufficientEarnings {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Not enough physical cash on hand: holding {available}, requested {requested}")]
    InsufficientCash {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Rider {rider_id} balance {balance} cannot cover refund of {amount}")]
    InsufficientBalance {
        rider_id: i64,
        balance: Decimal,
        amount: Decimal,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Current wallet state plus journal history for one actor, provisioning
/// the wallet (and a placeholder actor) on first access.
pub async fn get_wallet(
    pool: &PgPool,
    user_id: i64,
) -> Result<(Wallet, Vec<WalletTransaction>), WalletError> {
    let wallet = match wallet_repo::find_by_user_id(pool, user_id).await? {
        Some(wallet) => wallet,
        None => {
            let mut tx = pool.begin().await?;
            let wallet = wallet_repo::lock_or_provision(&mut tx, user_id).await?;
            tx.commit().await?;
            wallet
        }
    };

    let history = transaction_repo::list_for_wallet(pool, wallet.id).await?;
    Ok((wallet, history))
}

/// Admin takes physical cash from the rider; rider's spendable balance goes
/// up and the admin's cash custody goes up by the same amount.
pub async fn recharge(pool: &PgPool, request: &RechargeRequest) -> Result<Wallet, WalletError> {
    validation::validate_wallet_operation(
        request.rider_id,
        request.admin_id,
        request.amount,
        request.reason.as_deref(),
    )?;

    let mut tx = pool.begin().await?;

    let rider_wallet = wallet_repo::lock_or_provision(&mut tx, request.rider_id).await?;
    let admin_wallet = wallet_repo::lock_or_provision(&mut tx, request.admin_id).await?;

    let rider_wallet =
        wallet_repo::apply_deltas(&mut tx, rider_wallet.id, request.amount, Decimal::ZERO, Decimal::ZERO)
            .await?;
    wallet_repo::apply_deltas(&mut tx, admin_wallet.id, Decimal::ZERO, request.amount, Decimal::ZERO)
        .await?;

    transaction_repo::insert_entry(
        &mut tx,
        Uuid::new_v4(),
        rider_wallet.id,
        Some(request.admin_id),
        request.amount,
        EntryType::Recharge,
        request.reason.as_deref().unwrap_or("Cash recharge"),
        rider_wallet.balance,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        rider_id = request.rider_id,
        admin_id = request.admin_id,
        amount = %request.amount,
        balance_after = %rider_wallet.balance,
        "Rider recharged"
    );

    Ok(rider_wallet)
}

/// Deduct from the rider's balance, accruing the amount as platform
/// earnings. Refuses to overdraft unless `force` is set.
pub async fn deduct(pool: &PgPool, request: &DeductRequest) -> Result<Wallet, WalletError> {
    validation::validate_wallet_operation(
        request.rider_id,
        request.admin_id,
        request.amount,
        request.reason.as_deref(),
    )?;

    let mut tx = pool.begin().await?;

    let rider_wallet = wallet_repo::lock_or_provision(&mut tx, request.rider_id).await?;
    let admin_wallet = wallet_repo::lock_or_provision(&mut tx, request.admin_id).await?;

    if rider_wallet.balance < request.amount && !request.force {
        // Rollback happens on drop; nothing has been written yet.
        return Err(WalletError::ConfirmLowBalance {
            rider_id: request.rider_id,
            balance: rider_wallet.balance,
            amount: request.amount,
        });
    }

    let rider_wallet =
        wallet_repo::apply_deltas(&mut tx, rider_wallet.id, -request.amount, Decimal::ZERO, Decimal::ZERO)
            .await?;
    wallet_repo::apply_deltas(&mut tx, admin_wallet.id, Decimal::ZERO, Decimal::ZERO, request.amount)
        .await?;

    transaction_repo::insert_entry(
        &mut tx,
        Uuid::new_v4(),
        rider_wallet.id,
        Some(request.admin_id),
        -request.amount,
        EntryType::Deduction,
        request.reason.as_deref().unwrap_or("Admin deduction"),
        rider_wallet.balance,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        rider_id = request.rider_id,
        admin_id = request.admin_id,
        amount = %request.amount,
        forced = request.force,
        balance_after = %rider_wallet.balance,
        "Rider balance deducted"
    );

    Ok(rider_wallet)
}

/// Withdraw accrued platform profit from the cash box. Profit can only be
/// taken up to the lesser of accrued earnings and physical cash actually on
/// hand, so earnings not backed by custodied cash stay in the ledger.
pub async fn withdraw_earnings(
    pool: &PgPool,
    admin_id: i64,
    amount: Decimal,
) -> Result<Wallet, WalletError> {
    if admin_id <= 0 {
        return Err(ValidationError::InvalidAdminId(admin_id).into());
    }
    validation::validate_amount(amount)?;

    let mut tx = pool.begin().await?;

    let admin_wallet = wallet_repo::lock_or_provision(&mut tx, admin_id).await?;

    if admin_wallet.earnings < amount {
        return Err(WalletError::InsufficientEarnings {
            available: admin_wallet.earnings,
            requested: amount,
        });
    }
    if admin_wallet.cash_on_hand < amount {
        return Err(WalletError::InsufficientCash {
            available: admin_wallet.cash_on_hand,
            requested: amount,
        });
    }

    let admin_wallet =
        wallet_repo::apply_deltas(&mut tx, admin_wallet.id, Decimal::ZERO, -amount, -amount).await?;

    transaction_repo::insert_entry(
        &mut tx,
        Uuid::new_v4(),
        admin_wallet.id,
        Some(admin_id),
        -amount,
        EntryType::Withdraw,
        "Profit withdrawal",
        admin_wallet.earnings,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        admin_id,
        amount = %amount,
        earnings_after = %admin_wallet.earnings,
        cash_after = %admin_wallet.cash_on_hand,
        "Earnings withdrawn"
    );

    Ok(admin_wallet)
}

/// Pay a rider's balance back out of the admin's cash box. Both sides must
/// cover the amount; there is no force override on this path.
pub async fn refund(pool: &PgPool, request: &RefundRequest) -> Result<Wallet, WalletError> {
    validation::validate_wallet_operation(
        request.rider_id,
        request.admin_id,
        request.amount,
        request.reason.as_deref(),
    )?;

    let mut tx = pool.begin().await?;

    let rider_wallet = wallet_repo::lock_or_provision(&mut tx, request.rider_id).await?;
    let admin_wallet = wallet_repo::lock_or_provision(&mut tx, request.admin_id).await?;

    if rider_wallet.balance < request.amount {
        return Err(WalletError::InsufficientBalance {
            rider_id: request.rider_id,
            balance: rider_wallet.balance,
            amount: request.amount,
        });
    }
    if admin_wallet.cash_on_hand < request.amount {
        return Err(WalletError::InsufficientCash {
            available: admin_wallet.cash_on_hand,
            requested: request.amount,
        });
    }

    let rider_wallet =
        wallet_repo::apply_deltas(&mut tx, rider_wallet.id, -request.amount, Decimal::ZERO, Decimal::ZERO)
            .await?;
    wallet_repo::apply_deltas(&mut tx, admin_wallet.id, Decimal::ZERO, -request.amount, Decimal::ZERO)
        .await?;

    transaction_repo::insert_entry(
        &mut tx,
        Uuid::new_v4(),
        rider_wallet.id,
        Some(request.admin_id),
        -request.amount,
        EntryType::Refund,
        request.reason.as_deref().unwrap_or("Balance refund"),
        rider_wallet.balance,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        rider_id = request.rider_id,
        admin_id = request.admin_id,
        amount = %request.amount,
        balance_after = %rider_wallet.balance,
        "Rider refunded"
    );

    Ok(rider_wallet)
}
