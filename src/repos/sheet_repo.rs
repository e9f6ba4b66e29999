//! Repository for daily delivery sheets
//!
//! One sheet per (rider, delivery date). Submission upserts on that key and
//! always lands in `pending`; the settlement flow is the only writer that
//! transitions a sheet to `approved`, after which the submission path refuses
//! to touch it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::commission::{ComputedRecord, SheetComputation};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";

/// Daily sheet model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailySheet {
    pub id: Uuid,
    pub rider_id: i64,
    pub delivery_date: NaiveDate,
    pub records: Json<Vec<ComputedRecord>>,
    pub total_delivery_fee: Decimal,
    pub total_restaurant_comm: Decimal,
    pub total_service_charge: Decimal,
    pub admin_comm_delivery: Decimal,
    pub admin_comm_service: Decimal,
    pub admin_comm_restaurant: Decimal,
    pub admin_commission: Decimal,
    pub gross_earnings: Decimal,
    pub actual_earnings: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailySheet {
    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }
}

/// Pending sheet enriched with the owning rider's display identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingSheet {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub sheet: DailySheet,
    pub rider_name: String,
    pub rider_mobile: String,
}

const SHEET_COLUMNS: &str = r#"id, rider_id, delivery_date, records,
    total_delivery_fee, total_restaurant_comm, total_service_charge,
    admin_comm_delivery, admin_comm_service, admin_comm_restaurant,
    admin_commission, gross_earnings, actual_earnings,
    status, created_at, updated_at"#;

pub async fn find_by_rider_and_date(
    pool: &PgPool,
    rider_id: i64,
    date: NaiveDate,
) -> Result<Option<DailySheet>, sqlx::Error> {
    sqlx::query_as::<_, DailySheet>(&format!(
        r#"
        SELECT {SHEET_COLUMNS}
        FROM daily_sheets
        WHERE rider_id = $1 AND delivery_date = $2
        "#
    ))
    .bind(rider_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Lock the sheet row for (rider, date) for the remainder of the
/// transaction. Submission takes this lock before deciding between
/// overwrite and locked-sheet rejection.
pub async fn lock_by_rider_and_date(
    tx: &mut Transaction<'_, Postgres>,
    rider_id: i64,
    date: NaiveDate,
) -> Result<Option<DailySheet>, sqlx::Error> {
    sqlx::query_as::<_, DailySheet>(&format!(
        r#"
        SELECT {SHEET_COLUMNS}
        FROM daily_sheets
        WHERE rider_id = $1 AND delivery_date = $2
        FOR UPDATE
        "#
    ))
    .bind(rider_id)
    .bind(date)
    .fetch_optional(&mut **tx)
    .await
}

/// Lock a sheet row by id. Settlement takes this lock before the pending
/// check so two concurrent approvals serialize.
pub async fn lock_by_id(
    tx: &mut Transaction<'_, Postgres>,
    sheet_id: Uuid,
) -> Result<Option<DailySheet>, sqlx::Error> {
    sqlx::query_as::<_, DailySheet>(&format!(
        r#"
        SELECT {SHEET_COLUMNS}
        FROM daily_sheets
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(sheet_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Upsert the sheet for (rider, date) from a fresh computation, forcing
/// status back to pending. A previous pending computation is replaced
/// wholesale, never merged.
pub async fn upsert_pending(
    tx: &mut Transaction<'_, Postgres>,
    rider_id: i64,
    date: NaiveDate,
    computation: &SheetComputation,
) -> Result<DailySheet, sqlx::Error> {
    sqlx::query_as::<_, DailySheet>(&format!(
        r#"
        INSERT INTO daily_sheets (
            id, rider_id, delivery_date, records,
            total_delivery_fee, total_restaurant_comm, total_service_charge,
            admin_comm_delivery, admin_comm_service, admin_comm_restaurant,
            admin_commission, gross_earnings, actual_earnings, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (rider_id, delivery_date)
        DO UPDATE SET
            records = EXCLUDED.records,
            total_delivery_fee = EXCLUDED.total_delivery_fee,
            total_restaurant_comm = EXCLUDED.total_restaurant_comm,
            total_service_charge = EXCLUDED.total_service_charge,
            admin_comm_delivery = EXCLUDED.admin_comm_delivery,
            admin_comm_service = EXCLUDED.admin_comm_service,
            admin_comm_restaurant = EXCLUDED.admin_comm_restaurant,
            admin_commission = EXCLUDED.admin_commission,
            gross_earnings = EXCLUDED.gross_earnings,
            actual_earnings = EXCLUDED.actual_earnings,
            status = EXCLUDED.status,
            updated_at = NOW()
        RETURNING {SHEET_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(rider_id)
    .bind(date)
    .bind(Json(&computation.records))
    .bind(computation.total_delivery_fee)
    .bind(computation.total_restaurant_comm)
    .bind(computation.total_service_charge)
    .bind(computation.admin_comm_delivery)
    .bind(computation.admin_comm_service)
    .bind(computation.admin_comm_restaurant)
    .bind(computation.admin_commission)
    .bind(computation.gross_earnings)
    .bind(computation.actual_earnings)
    .bind(STATUS_PENDING)
    .fetch_one(&mut **tx)
    .await
}

/// All sheets for a rider, most recent delivery date first.
pub async fn list_history(pool: &PgPool, rider_id: i64) -> Result<Vec<DailySheet>, sqlx::Error> {
    sqlx::query_as::<_, DailySheet>(&format!(
        r#"
        SELECT {SHEET_COLUMNS}
        FROM daily_sheets
        WHERE rider_id = $1
        ORDER BY delivery_date DESC
        "#
    ))
    .bind(rider_id)
    .fetch_all(pool)
    .await
}

/// The pending backlog, oldest unresolved date first, with rider identity.
pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingSheet>, sqlx::Error> {
    sqlx::query_as::<_, PendingSheet>(
        r#"
        SELECT s.id, s.rider_id, s.delivery_date, s.records,
               s.total_delivery_fee, s.total_restaurant_comm, s.total_service_charge,
               s.admin_comm_delivery, s.admin_comm_service, s.admin_comm_restaurant,
               s.admin_commission, s.gross_earnings, s.actual_earnings,
               s.status, s.created_at, s.updated_at,
               u.name AS rider_name, u.mobile AS rider_mobile
        FROM daily_sheets s
        INNER JOIN users u ON u.id = s.rider_id
        WHERE s.status = $1
        ORDER BY s.delivery_date ASC
        "#,
    )
    .bind(STATUS_PENDING)
    .fetch_all(pool)
    .await
}

/// All sheets for one delivery date, regardless of status.
pub async fn list_for_date(pool: &PgPool, date: NaiveDate) -> Result<Vec<DailySheet>, sqlx::Error> {
    sqlx::query_as::<_, DailySheet>(&format!(
        r#"
        SELECT {SHEET_COLUMNS}
        FROM daily_sheets
        WHERE delivery_date = $1
        "#
    ))
    .bind(date)
    .fetch_all(pool)
    .await
}

/// Flip a locked pending sheet to approved.
pub async fn mark_approved(
    tx: &mut Transaction<'_, Postgres>,
    sheet_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE daily_sheets
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(sheet_id)
    .bind(STATUS_APPROVED)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
