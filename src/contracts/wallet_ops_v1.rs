//! Wallet Operation V1 Contract Types
//!
//! Payloads for the ledger-mutating wallet operations and the wallet read
//! path. Amounts are decimals on the wire; validation rejects zero and
//! negative amounts before any store access.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repos::transaction_repo::WalletTransaction;
use crate::repos::wallet_repo::Wallet;

/// POST /api/recharge: admin takes physical cash, rider balance goes up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RechargeRequest {
    pub rider_id: i64,
    pub admin_id: i64,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// POST /api/deduct: rider balance down, platform earnings up.
///
/// When the rider's balance cannot cover the amount the call fails with a
/// recoverable confirmation error unless `force` is set, in which case the
/// balance is allowed to go negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeductRequest {
    pub rider_id: i64,
    pub admin_id: i64,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub force: bool,
}

/// POST /api/withdraw: admin takes accrued profit out of the cash box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawRequest {
    pub admin_id: i64,
    pub amount: Decimal,
}

/// POST /api/refund-rider: rider cashes out balance, admin pays from the box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefundRequest {
    pub rider_id: i64,
    pub admin_id: i64,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response for GET /api/wallet/{user_id}: current wallet state plus the
/// journal history, newest entry first.
#[derive(Debug, Clone, Serialize)]
pub struct WalletWithHistory {
    pub wallet: Wallet,
    pub history: Vec<WalletTransaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationResponse {
    pub message: String,
}
