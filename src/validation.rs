//! Request payload validation
//!
//! Every mutating endpoint validates its payload here before any store
//! access. Errors enumerate the offending field so clients get a precise,
//! machine-readable rejection instead of a generic 400.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::contracts::daily_sheet_v1::SubmitDailySheetRequest;
use crate::contracts::rider_v1::{CreateRiderRequest, LoginRequest, UpdateProfileRequest};

/// Validation errors, one variant per rejected field condition
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("rider_id must be a positive id, got {0}")]
    InvalidRiderId(i64),

    #[error("admin_id must be a positive id, got {0}")]
    InvalidAdminId(i64),

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("records must contain at least 1 item")]
    EmptyRecords,

    #[error("Record {0}: fee must be non-negative, got {1}")]
    NegativeFee(usize, Decimal),

    #[error("Record {0}: comm must be non-negative, got {1}")]
    NegativeComm(usize, Decimal),

    #[error("Record {0}: svc must be non-negative, got {1}")]
    NegativeSvc(usize, Decimal),

    #[error("name must not be empty")]
    EmptyName,

    #[error("mobile must not be empty")]
    EmptyMobile,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("email is not a valid address: {0}")]
    InvalidEmail(String),

    #[error("reason exceeds 500 characters, got {0}")]
    ReasonTooLong(usize),
}

/// Validate a daily-sheet submission payload
///
/// # Validation Rules
///
/// - `rider_id`: positive
/// - `records`: at least one item
/// - Each record: `fee`, `comm`, `svc` all non-negative
pub fn validate_submit_sheet(payload: &SubmitDailySheetRequest) -> Result<(), ValidationError> {
    if payload.rider_id <= 0 {
        return Err(ValidationError::InvalidRiderId(payload.rider_id));
    }

    if payload.records.is_empty() {
        return Err(ValidationError::EmptyRecords);
    }

    for (idx, record) in payload.records.iter().enumerate() {
        if record.fee < Decimal::ZERO {
            return Err(ValidationError::NegativeFee(idx, record.fee));
        }
        if record.comm < Decimal::ZERO {
            return Err(ValidationError::NegativeComm(idx, record.comm));
        }
        if record.svc < Decimal::ZERO {
            return Err(ValidationError::NegativeSvc(idx, record.svc));
        }
    }

    Ok(())
}

/// Validate a wallet operation: both actor ids positive, amount strictly
/// positive, optional reason bounded.
pub fn validate_wallet_operation(
    rider_id: i64,
    admin_id: i64,
    amount: Decimal,
    reason: Option<&str>,
) -> Result<(), ValidationError> {
    if rider_id <= 0 {
        return Err(ValidationError::InvalidRiderId(rider_id));
    }
    if admin_id <= 0 {
        return Err(ValidationError::InvalidAdminId(admin_id));
    }
    validate_amount(amount)?;
    if let Some(reason) = reason {
        if reason.len() > 500 {
            return Err(ValidationError::ReasonTooLong(reason.len()));
        }
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

pub fn validate_login(payload: &LoginRequest) -> Result<(), ValidationError> {
    if payload.mobile.trim().is_empty() {
        return Err(ValidationError::EmptyMobile);
    }
    if payload.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

pub fn validate_create_rider(payload: &CreateRiderRequest) -> Result<(), ValidationError> {
    if payload.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if payload.mobile.trim().is_empty() {
        return Err(ValidationError::EmptyMobile);
    }
    Ok(())
}

pub fn validate_update_profile(payload: &UpdateProfileRequest) -> Result<(), ValidationError> {
    if payload.id <= 0 {
        return Err(ValidationError::InvalidRiderId(payload.id));
    }
    if payload.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if payload.mobile.trim().is_empty() {
        return Err(ValidationError::EmptyMobile);
    }
    if let Some(email) = payload.email.as_deref() {
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
    }
    if let Some(password) = payload.password.as_deref() {
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
    }
    Ok(())
}
