//! Daily sheet endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::contracts::daily_sheet_v1::{
    ApproveSheetRequest, ApproveSheetResponse, GetDailySheetQuery, StatusReportEntry,
    StatusReportQuery, SubmitDailySheetRequest, SubmitDailySheetResponse,
};
use crate::notify;
use crate::repos::sheet_repo::{DailySheet, PendingSheet};
use crate::repos::user_repo;
use crate::routes::{ApiError, AppState};
use crate::services::settlement_service::{self, SettlementError};
use crate::services::sheet_service::{self, SheetError};

/// Map sheet service errors to HTTP responses
fn map_sheet_error(error: SheetError) -> ApiError {
    match error {
        SheetError::Validation(e) => ApiError::validation(e.to_string()),
        SheetError::RiderNotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
        }
        SheetError::Locked { .. } => {
            ApiError::new(StatusCode::FORBIDDEN, "LOCKED", error.to_string())
        }
        SheetError::Database(e) => ApiError::internal(e),
    }
}

/// Map settlement errors to HTTP responses
fn map_settlement_error(error: SettlementError) -> ApiError {
    match error {
        SettlementError::SheetNotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
        }
        SettlementError::AlreadyProcessed(_) => ApiError::new(
            StatusCode::BAD_REQUEST,
            "ALREADY_PROCESSED",
            error.to_string(),
        ),
        SettlementError::Database(e) => ApiError::internal(e),
    }
}

/// Handler for POST /api/submit-daily-sheet
///
/// 403 LOCKED when the sheet for (rider, date) is already approved; the
/// stored sheet is untouched in that case.
pub async fn submit_daily_sheet(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitDailySheetRequest>,
) -> Result<Json<SubmitDailySheetResponse>, ApiError> {
    let sheet = sheet_service::submit(&state.pool, &request)
        .await
        .map_err(map_sheet_error)?;

    Ok(Json(SubmitDailySheetResponse {
        message: "Daily sheet saved successfully".to_string(),
        data: sheet,
    }))
}

/// Handler for GET /api/get-daily-sheet?rider_id=..&date=..
///
/// Absence is a normal state: responds 200 with a JSON null body.
pub async fn get_daily_sheet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetDailySheetQuery>,
) -> Result<Json<Option<DailySheet>>, ApiError> {
    let sheet = sheet_service::get(&state.pool, query.rider_id, query.date)
        .await
        .map_err(map_sheet_error)?;

    Ok(Json(sheet))
}

/// Handler for GET /api/rider-history/{rider_id}
pub async fn rider_history(
    State(state): State<Arc<AppState>>,
    Path(rider_id): Path<i64>,
) -> Result<Json<Vec<DailySheet>>, ApiError> {
    let sheets = sheet_service::history(&state.pool, rider_id)
        .await
        .map_err(map_sheet_error)?;

    Ok(Json(sheets))
}

/// Handler for GET /api/pending-sheets
pub async fn pending_sheets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PendingSheet>>, ApiError> {
    let sheets = sheet_service::pending(&state.pool)
        .await
        .map_err(map_sheet_error)?;

    Ok(Json(sheets))
}

/// Handler for POST /api/approve-sheet
///
/// 400 ALREADY_PROCESSED on the second call; balances are untouched then.
pub async fn approve_sheet(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ApproveSheetRequest>,
) -> Result<Json<ApproveSheetResponse>, ApiError> {
    let settlement =
        settlement_service::approve_sheet(&state.pool, state.treasury_user_id, request.sheet_id)
            .await
            .map_err(map_settlement_error)?;

    let token = user_repo::find_by_id(&state.pool, settlement.rider_id)
        .await
        .ok()
        .flatten()
        .and_then(|u| u.fcm_token);
    notify::dispatch(
        state.notifier.clone(),
        token,
        "Daily sheet approved".to_string(),
        format!(
            "Your sheet for {} was approved; {} commission was settled.",
            settlement.delivery_date, settlement.amount
        ),
    );

    Ok(Json(ApproveSheetResponse {
        message: "Sheet approved and wallet deducted successfully".to_string(),
        sheet_id: settlement.sheet_id,
    }))
}

/// Handler for GET /api/daily-status-report?date=..
pub async fn daily_status_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusReportQuery>,
) -> Result<Json<Vec<StatusReportEntry>>, ApiError> {
    let report = sheet_service::status_report(&state.pool, query.date)
        .await
        .map_err(map_sheet_error)?;

    Ok(Json(report))
}
