//! Integration tests for the daily sheet lifecycle
//!
//! Submission, pending overwrite, the approved-sheet lock, and the read
//! paths (history ordering, pending backlog, daily status report).

mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serial_test::serial;

use rider_ledger_rs::commission::DeliveryRecord;
use rider_ledger_rs::contracts::daily_sheet_v1::SubmitDailySheetRequest;
use rider_ledger_rs::services::settlement_service;
use rider_ledger_rs::services::sheet_service::{self, SheetError};

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

fn submit_req(rider_id: i64, d: &str, records: Vec<DeliveryRecord>) -> SubmitDailySheetRequest {
    SubmitDailySheetRequest {
        rider_id,
        date: date(d),
        records,
    }
}

#[tokio::test]
#[serial]
async fn submit_computes_and_stores_the_full_split() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Sheet Rider").await;

    let sheet = sheet_service::submit(
        &pool,
        &submit_req(
            rider_id,
            "2026-03-02",
            vec![record("250", "20", "50"), record("400", "30", "120")],
        ),
    )
    .await
    .expect("submit failed");

    assert_eq!(sheet.status, "pending");
    assert_eq!(sheet.total_delivery_fee, dec("650"));
    assert_eq!(sheet.total_restaurant_comm, dec("50"));
    assert_eq!(sheet.total_service_charge, dec("170"));
    assert_eq!(sheet.admin_comm_delivery, dec("50"));
    assert_eq!(sheet.admin_comm_service, dec("85"));
    assert_eq!(sheet.admin_comm_restaurant, dec("50"));
    assert_eq!(sheet.admin_commission, dec("185"));
    assert_eq!(sheet.gross_earnings, dec("870"));
    assert_eq!(sheet.actual_earnings, dec("685"));

    // The echoed records keep their per-record admin shares.
    assert_eq!(sheet.records.0.len(), 2);
    assert_eq!(sheet.records.0[0].admin_fee, dec("10"));
    assert_eq!(sheet.records.0[1].admin_fee, dec("40"));

    common::cleanup_users(&pool, &[rider_id]).await;
}

#[tokio::test]
#[serial]
async fn resubmit_while_pending_replaces_wholesale() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Overwrite Rider").await;

    let first = sheet_service::submit(
        &pool,
        &submit_req(
            rider_id,
            "2026-03-03",
            vec![record("250", "20", "50"), record("400", "30", "120")],
        ),
    )
    .await
    .unwrap();

    let second = sheet_service::submit(
        &pool,
        &submit_req(rider_id, "2026-03-03", vec![record("100", "5", "80")]),
    )
    .await
    .unwrap();

    // Same row, fully replaced, with no merge against the first payload.
    assert_eq!(second.id, first.id);
    assert_eq!(second.status, "pending");
    assert_eq!(second.records.0.len(), 1);
    assert_eq!(second.total_delivery_fee, dec("100"));
    assert_eq!(second.total_restaurant_comm, dec("5"));
    assert_eq!(second.total_service_charge, dec("80"));
    assert_eq!(second.admin_comm_delivery, dec("10"));
    assert_eq!(second.admin_comm_service, dec("25"));
    assert_eq!(second.admin_commission, dec("40")); // 10 + 25 + 5

    let history = sheet_service::history(&pool, rider_id).await.unwrap();
    assert_eq!(history.len(), 1);

    common::cleanup_users(&pool, &[rider_id]).await;
}

#[tokio::test]
#[serial]
async fn submit_against_approved_sheet_is_locked_and_leaves_it_unchanged() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Locked Rider").await;
    let treasury_id = common::create_test_admin(&pool, "Locked Treasury").await;

    let sheet = sheet_service::submit(
        &pool,
        &submit_req(rider_id, "2026-03-04", vec![record("250", "20", "50")]),
    )
    .await
    .unwrap();

    settlement_service::approve_sheet(&pool, treasury_id, sheet.id)
        .await
        .expect("approve failed");

    let result = sheet_service::submit(
        &pool,
        &submit_req(rider_id, "2026-03-04", vec![record("999", "99", "180")]),
    )
    .await;
    assert!(matches!(result, Err(SheetError::Locked { .. })));

    // Stored sheet is untouched by the rejected write.
    let stored = sheet_service::get(&pool, rider_id, date("2026-03-04"))
        .await
        .unwrap()
        .expect("sheet vanished");
    assert_eq!(stored.status, "approved");
    assert_eq!(stored.total_delivery_fee, dec("250"));
    assert_eq!(stored.records.0.len(), 1);
    assert_eq!(stored.records.0[0].fee, dec("250"));

    common::cleanup_users(&pool, &[rider_id, treasury_id]).await;
}

#[tokio::test]
#[serial]
async fn get_returns_none_for_absent_sheet() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "No Sheet Rider").await;

    let sheet = sheet_service::get(&pool, rider_id, date("2026-03-05"))
        .await
        .unwrap();
    assert!(sheet.is_none());

    common::cleanup_users(&pool, &[rider_id]).await;
}

#[tokio::test]
#[serial]
async fn submit_for_unknown_rider_is_not_found() {
    let Some(pool) = common::try_test_pool().await else { return };
    let missing_rider = 800_000_000 + (uuid::Uuid::new_v4().as_u128() % 1_000_000) as i64;

    let result = sheet_service::submit(
        &pool,
        &submit_req(missing_rider, "2026-03-05", vec![record("250", "20", "50")]),
    )
    .await;
    assert!(matches!(result, Err(SheetError::RiderNotFound(id)) if id == missing_rider));
}

#[tokio::test]
#[serial]
async fn history_is_descending_and_pending_backlog_ascending() {
    let Some(pool) = common::try_test_pool().await else { return };
    let rider_id = common::create_test_rider(&pool, "Ordering Rider").await;

    for d in ["2026-03-10", "2026-03-08", "2026-03-09"] {
        sheet_service::submit(&pool, &submit_req(rider_id, d, vec![record("250", "0", "0")]))
            .await
            .unwrap();
    }

    let history = sheet_service::history(&pool, rider_id).await.unwrap();
    let dates: Vec<NaiveDate> = history.iter().map(|s| s.delivery_date).collect();
    assert_eq!(
        dates,
        vec![date("2026-03-10"), date("2026-03-09"), date("2026-03-08")]
    );

    // The backlog queue is oldest-first and carries the rider's identity.
    let pending = sheet_service::pending(&pool).await.unwrap();
    let ours: Vec<_> = pending
        .iter()
        .filter(|p| p.sheet.rider_id == rider_id)
        .collect();
    assert_eq!(ours.len(), 3);
    assert_eq!(ours[0].sheet.delivery_date, date("2026-03-08"));
    assert_eq!(ours[2].sheet.delivery_date, date("2026-03-10"));
    assert_eq!(ours[0].rider_name, "Ordering Rider");
    assert!(!ours[0].rider_mobile.is_empty());

    common::cleanup_users(&pool, &[rider_id]).await;
}

#[tokio::test]
#[serial]
async fn status_report_classifies_missing_pending_and_approved() {
    let Some(pool) = common::try_test_pool().await else { return };
    let silent = common::create_test_rider(&pool, "Silent Rider").await;
    let submitted = common::create_test_rider(&pool, "Submitted Rider").await;
    let settled = common::create_test_rider(&pool, "Settled Rider").await;
    let treasury_id = common::create_test_admin(&pool, "Report Treasury").await;
    let report_date = "2026-03-12";

    sheet_service::submit(
        &pool,
        &submit_req(submitted, report_date, vec![record("250", "0", "0")]),
    )
    .await
    .unwrap();

    let sheet = sheet_service::submit(
        &pool,
        &submit_req(settled, report_date, vec![record("250", "0", "0")]),
    )
    .await
    .unwrap();
    settlement_service::approve_sheet(&pool, treasury_id, sheet.id)
        .await
        .unwrap();

    let report = sheet_service::status_report(&pool, date(report_date))
        .await
        .unwrap();

    let entry_for = |id: i64| report.iter().find(|e| e.rider_id == id).expect("rider missing from report");

    let silent_entry = entry_for(silent);
    assert_eq!(silent_entry.status, "missing");
    assert!(silent_entry.sheet_data.is_none());

    let submitted_entry = entry_for(submitted);
    assert_eq!(submitted_entry.status, "pending");
    assert!(submitted_entry.sheet_data.is_some());

    let settled_entry = entry_for(settled);
    assert_eq!(settled_entry.status, "approved");
    assert_eq!(
        settled_entry.sheet_data.as_ref().unwrap().delivery_date,
        date(report_date)
    );

    common::cleanup_users(&pool, &[silent, submitted, settled, treasury_id]).await;
}
