//! Integration tests for sheet settlement
//!
//! The approve flow is the one place the sheet store and the wallet ledger
//! share a transaction; these tests check the debit/credit pair, the
//! two-sided journal, and the one-time-transition guard.

mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serial_test::serial;
use uuid::Uuid;

use rider_ledger_rs::commission::DeliveryRecord;
use rider_ledger_rs::contracts::daily_sheet_v1::SubmitDailySheetRequest;
use rider_ledger_rs::repos::{transaction_repo, wallet_repo};
use rider_ledger_rs::services::settlement_service::{self, SettlementError};
use rider_ledger_rs::services::sheet_service;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn record(fee: &str, comm: &str, svc: &str) -> DeliveryRecord {
    DeliveryRecord {
        fee: dec(fee),
        comm: dec(comm),
        svc: dec(svc),
    }
}

async fn submit_worked_example(
    pool: &sqlx::PgPool,
    rider_id: i64,
    d: &str,
) -> rider_ledger_rs::repos::sheet_repo::DailySheet {
    sheet_service::submit(
        pool,
        &SubmitDailySheetRequest {
            rider_id,
            date: date(d),
            records: vec![record("250", "20", "50"), record("400", "30", "120")],
        },
    )
    .await
    .expect("submit failed")
}

#[tokio::test]
#[serial]
async fn approve_settles_commission_with_two_sided_journal() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Settle Rider").await;
    let treasury_id = common::create_test_admin(&pool, "Settle Treasury").await;

    let sheet = submit_worked_example(&pool, rider_id, "2026-04-01").await;
    assert_eq!(sheet.admin_commission, dec("185"));

    let settlement = settlement_service::approve_sheet(&pool, treasury_id, sheet.id)
        .await
        .expect("approve failed");

    assert_eq!(settlement.amount, dec("185"));
    assert_eq!(settlement.rider_balance_after, dec("-185"));
    assert_eq!(settlement.treasury_earnings_after, dec("185"));

    // Rider wallet was provisioned at balance 0 and driven negative.
    let rider_wallet = wallet_repo::find_by_user_id(&pool, rider_id)
        .await
        .unwrap()
        .expect("rider wallet missing");
    assert_eq!(rider_wallet.balance, dec("-185"));

    let treasury_wallet = wallet_repo::find_by_user_id(&pool, treasury_id)
        .await
        .unwrap()
        .expect("treasury wallet missing");
    assert_eq!(treasury_wallet.earnings, dec("185"));
    assert_eq!(treasury_wallet.cash_on_hand, Decimal::ZERO);

    // Exactly one journal entry per wallet side.
    let rider_journal = transaction_repo::list_for_wallet(&pool, rider_wallet.id)
        .await
        .unwrap();
    assert_eq!(rider_journal.len(), 1);
    assert_eq!(rider_journal[0].entry_type, "deduction");
    assert_eq!(rider_journal[0].amount, dec("-185"));
    assert_eq!(rider_journal[0].balance_after, dec("-185"));

    let treasury_journal = transaction_repo::list_for_wallet(&pool, treasury_wallet.id)
        .await
        .unwrap();
    assert_eq!(treasury_journal.len(), 1);
    assert_eq!(treasury_journal[0].entry_type, "sheet_earnings");
    assert_eq!(treasury_journal[0].amount, dec("185"));
    assert_eq!(treasury_journal[0].balance_after, dec("185"));

    // The sheet is now approved.
    let stored = sheet_service::get(&pool, rider_id, date("2026-04-01"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "approved");

    common::cleanup_users(&pool, &[rider_id, treasury_id]).await;
}

#[tokio::test]
#[serial]
async fn approve_twice_fails_without_touching_balances() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Idempotent Rider").await;
    let treasury_id = common::create_test_admin(&pool, "Idempotent Treasury").await;

    let sheet = submit_worked_example(&pool, rider_id, "2026-04-02").await;

    settlement_service::approve_sheet(&pool, treasury_id, sheet.id)
        .await
        .expect("first approve failed");

    let result = settlement_service::approve_sheet(&pool, treasury_id, sheet.id).await;
    assert!(matches!(result, Err(SettlementError::AlreadyProcessed(id)) if id == sheet.id));

    // Balances and journal are exactly as after the first approval.
    let rider_wallet = wallet_repo::find_by_user_id(&pool, rider_id)
        .await
        .unwrap()
        .unwrap();
    let treasury_wallet = wallet_repo::find_by_user_id(&pool, treasury_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rider_wallet.balance, dec("-185"));
    assert_eq!(treasury_wallet.earnings, dec("185"));
    assert_eq!(common::journal_count(&pool, rider_wallet.id).await, 1);
    assert_eq!(common::journal_count(&pool, treasury_wallet.id).await, 1);

    common::cleanup_users(&pool, &[rider_id, treasury_id]).await;
}

#[tokio::test]
#[serial]
async fn approve_unknown_sheet_is_not_found() {
    let Some(pool) = common::try_test_pool().await else { return };
    let treasury_id = common::create_test_admin(&pool, "Missing Treasury").await;

    let bogus = Uuid::new_v4();
    let result = settlement_service::approve_sheet(&pool, treasury_id, bogus).await;
    assert!(matches!(result, Err(SettlementError::SheetNotFound(id)) if id == bogus));

    common::cleanup_users(&pool, &[treasury_id]).await;
}

#[tokio::test]
#[serial]
async fn settlement_deducts_the_submission_time_commission() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Replace Rider").await;
    let treasury_id = common::create_test_admin(&pool, "Replace Treasury").await;

    // First submission computes 185; the overwrite drops it to 40. The
    // settlement must use the stored value from the latest submission.
    submit_worked_example(&pool, rider_id, "2026-04-03").await;
    let replaced = sheet_service::submit(
        &pool,
        &SubmitDailySheetRequest {
            rider_id,
            date: date("2026-04-03"),
            records: vec![record("100", "5", "80")],
        },
    )
    .await
    .unwrap();
    assert_eq!(replaced.admin_commission, dec("40"));

    let settlement = settlement_service::approve_sheet(&pool, treasury_id, replaced.id)
        .await
        .unwrap();
    assert_eq!(settlement.amount, dec("40"));
    assert_eq!(settlement.rider_balance_after, dec("-40"));

    common::cleanup_users(&pool, &[rider_id, treasury_id]).await;
}
