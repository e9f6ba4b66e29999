//! Wallet ledger endpoints
//!
//! Push dispatch here is best-effort: it runs after the transaction has
//! committed and can never fail the request.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::contracts::wallet_ops_v1::{
    DeductRequest, OperationResponse, RechargeRequest, RefundRequest, WalletWithHistory,
    WithdrawRequest,
};
use crate::notify;
use crate::repos::{user_repo, wallet_repo};
use crate::routes::{ApiError, AppState};
use crate::services::wallet_service::{self, WalletError};

/// Map service errors to HTTP responses
fn map_error(error: WalletError) -> ApiError {
    match error {
        WalletError::Validation(e) => ApiError::validation(e.to_string()),
        WalletError::ConfirmLowBalance { .. } => ApiError::new(
            StatusCode::CONFLICT,
            "CONFIRM_LOW_BALANCE",
            error.to_string(),
        ),
        WalletError::InsufficientEarnings { .. }
        | WalletError::InsufficientCash { .. }
        | WalletError::InsufficientBalance { .. } => ApiError::new(
            StatusCode::BAD_REQUEST,
            "INSUFFICIENT_FUNDS",
            error.to_string(),
        ),
        WalletError::Database(e) => ApiError::internal(e),
    }
}

/// Push a wallet event to the rider's device, if one is registered.
async fn push_to_rider(state: &Arc<AppState>, rider_id: i64, title: &str, body: String) {
    let token = user_repo::find_by_id(&state.pool, rider_id)
        .await
        .ok()
        .flatten()
        .and_then(|u| u.fcm_token);
    notify::dispatch(state.notifier.clone(), token, title.to_string(), body);
}

/// Handler for GET /api/wallet/{user_id}
///
/// Auto-provisions the wallet (and a placeholder actor) on first access.
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<WalletWithHistory>, ApiError> {
    let (wallet, history) = wallet_service::get_wallet(&state.pool, user_id)
        .await
        .map_err(map_error)?;

    Ok(Json(WalletWithHistory { wallet, history }))
}

/// Handler for POST /api/recharge
pub async fn recharge(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RechargeRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let wallet = wallet_service::recharge(&state.pool, &request)
        .await
        .map_err(map_error)?;

    push_to_rider(
        &state,
        request.rider_id,
        "Wallet recharged",
        format!("Your wallet was credited with {}. New balance: {}.", request.amount, wallet.balance),
    )
    .await;

    Ok(Json(OperationResponse {
        message: "Recharge successful".to_string(),
    }))
}

/// Handler for POST /api/deduct
///
/// Returns 409 CONFIRM_LOW_BALANCE when the balance cannot cover the amount
/// and `force` was not set; resubmitting with force=true overdrafts.
pub async fn deduct(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeductRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let wallet = wallet_service::deduct(&state.pool, &request)
        .await
        .map_err(map_error)?;

    push_to_rider(
        &state,
        request.rider_id,
        "Balance deducted",
        format!("{} was deducted from your wallet. New balance: {}.", request.amount, wallet.balance),
    )
    .await;

    Ok(Json(OperationResponse {
        message: "Deducted successfully".to_string(),
    }))
}

/// Handler for POST /api/withdraw
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    wallet_service::withdraw_earnings(&state.pool, request.admin_id, request.amount)
        .await
        .map_err(map_error)?;

    Ok(Json(OperationResponse {
        message: "Withdrawal successful".to_string(),
    }))
}

/// Handler for POST /api/refund-rider
pub async fn refund_rider(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefundRequest>,
) -> Result<Json<OperationResponse>, ApiError> {
    let wallet = wallet_service::refund(&state.pool, &request)
        .await
        .map_err(map_error)?;

    push_to_rider(
        &state,
        request.rider_id,
        "Refund issued",
        format!("{} was refunded from your balance. New balance: {}.", request.amount, wallet.balance),
    )
    .await;

    Ok(Json(OperationResponse {
        message: "Refund successful".to_string(),
    }))
}

/// Handler for GET /api/negative-wallets
pub async fn negative_wallets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<wallet_repo::WalletWithOwner>>, ApiError> {
    let wallets = wallet_repo::list_non_positive(&state.pool)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(wallets))
}
