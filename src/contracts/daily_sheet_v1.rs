//! Daily Sheet V1 Contract Types
//!
//! Request/response payloads for the daily-sheet lifecycle:
//! - Submit: rider reports one day's raw delivery records
//! - Get / History / Pending: read paths
//! - Approve: one-time settlement transition
//! - Status Report: per-rider submission state for a date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commission::DeliveryRecord;
use crate::repos::sheet_repo::DailySheet;

// ============================================================
// Submit Endpoint: POST /api/submit-daily-sheet
// ============================================================

/// Request to submit (or fully replace) a rider's sheet for one date.
///
/// Re-submitting while the sheet is pending overwrites the previous
/// computation wholesale; submitting against an approved sheet is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitDailySheetRequest {
    pub rider_id: i64,
    pub date: NaiveDate,
    pub records: Vec<DeliveryRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitDailySheetResponse {
    pub message: String,
    pub data: DailySheet,
}

// ============================================================
// Read Endpoints
// ============================================================

/// Query for GET /api/get-daily-sheet?rider_id=..&date=..
#[derive(Debug, Clone, Deserialize)]
pub struct GetDailySheetQuery {
    pub rider_id: i64,
    pub date: NaiveDate,
}

/// Query for GET /api/daily-status-report?date=..
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReportQuery {
    pub date: NaiveDate,
}

/// One row of the daily status report.
///
/// Every rider appears exactly once; riders with no sheet for the date carry
/// `status = "missing"` and a null `sheet_data`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReportEntry {
    pub rider_id: i64,
    pub name: String,
    pub status: String,
    pub sheet_data: Option<DailySheet>,
}

// ============================================================
// Approve Endpoint: POST /api/approve-sheet
// ============================================================

/// Request to approve a pending sheet and settle its commission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApproveSheetRequest {
    pub sheet_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveSheetResponse {
    pub message: String,
    pub sheet_id: Uuid,
}
