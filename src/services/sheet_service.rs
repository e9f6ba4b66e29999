//! Daily sheet lifecycle (submission and read paths)
//!
//! Submission recomputes the full commission split from the raw records and
//! replaces any previous pending computation for the same (rider, date).
//! Approved sheets are immutable: the submission path rejects them without
//! writing anything.

use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;

use crate::commission;
use crate::contracts::daily_sheet_v1::{StatusReportEntry, SubmitDailySheetRequest};
use crate::repos::sheet_repo::{self, DailySheet, PendingSheet};
use crate::repos::user_repo;
use crate::validation::{self, ValidationError};

/// Errors that can occur during sheet submission and queries
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Rider not found: {0}")]
    RiderNotFound(i64),

    /// The sheet for this (rider, date) is approved; no further writes.
    #[error("Daily sheet for rider {rider_id} on {date} is approved and locked")]
    Locked { rider_id: i64, date: NaiveDate },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Submit (or fully replace) the sheet for one rider and date.
///
/// Runs the commission calculator over the raw records and upserts the
/// result as a pending sheet. Fails with [`SheetError::Locked`] when the
/// existing sheet is approved; the stored sheet is left untouched in that
/// case.
pub async fn submit(
    pool: &PgPool,
    request: &SubmitDailySheetRequest,
) -> Result<DailySheet, SheetError> {
    validation::validate_submit_sheet(request)?;

    if user_repo::find_by_id(pool, request.rider_id).await?.is_none() {
        return Err(SheetError::RiderNotFound(request.rider_id));
    }

    let mut tx = pool.begin().await?;

    if let Some(existing) =
        sheet_repo::lock_by_rider_and_date(&mut tx, request.rider_id, request.date).await?
    {
        if !existing.is_pending() {
            return Err(SheetError::Locked {
                rider_id: request.rider_id,
                date: request.date,
            });
        }
    }

    let computation = commission::reconcile(&request.records);
    let sheet = sheet_repo::upsert_pending(&mut tx, request.rider_id, request.date, &computation).await?;

    tx.commit().await?;

    tracing::info!(
        rider_id = request.rider_id,
        date = %request.date,
        record_count = request.records.len(),
        admin_commission = %sheet.admin_commission,
        actual_earnings = %sheet.actual_earnings,
        "Daily sheet saved"
    );

    Ok(sheet)
}

/// The sheet for (rider, date), or `None`. Absence is a normal state, not
/// an error.
pub async fn get(
    pool: &PgPool,
    rider_id: i64,
    date: NaiveDate,
) -> Result<Option<DailySheet>, SheetError> {
    Ok(sheet_repo::find_by_rider_and_date(pool, rider_id, date).await?)
}

/// All of a rider's sheets, most recent delivery date first.
pub async fn history(pool: &PgPool, rider_id: i64) -> Result<Vec<DailySheet>, SheetError> {
    Ok(sheet_repo::list_history(pool, rider_id).await?)
}

/// The pending backlog with rider identity, oldest date first.
pub async fn pending(pool: &PgPool) -> Result<Vec<PendingSheet>, SheetError> {
    Ok(sheet_repo::list_pending(pool).await?)
}

/// Per-rider submission state for one date.
///
/// Outer join of all riders against that date's sheets: riders with no
/// sheet still appear, classified `missing` with null sheet data.
pub async fn status_report(
    pool: &PgPool,
    date: NaiveDate,
) -> Result<Vec<StatusReportEntry>, SheetError> {
    let riders = user_repo::list_riders(pool).await?;
    let sheets = sheet_repo::list_for_date(pool, date).await?;

    let mut by_rider: HashMap<i64, DailySheet> =
        sheets.into_iter().map(|s| (s.rider_id, s)).collect();

    let report = riders
        .into_iter()
        .map(|rider| {
            let sheet = by_rider.remove(&rider.id);
            let status = sheet
                .as_ref()
                .map(|s| s.status.clone())
                .unwrap_or_else(|| "missing".to_string());
            StatusReportEntry {
                rider_id: rider.id,
                name: rider.name,
                status,
                sheet_data: sheet,
            }
        })
        .collect();

    Ok(report)
}
