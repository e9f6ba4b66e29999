//! Commission calculator for daily delivery sheets
//!
//! Pure computation: takes the raw per-delivery records a rider reports for
//! one day and produces the per-record admin shares plus the sheet-level
//! aggregates. No I/O, no side effects; identical input always produces
//! identical output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Orders with a delivery fee below this cutoff pay a flat admin fee.
/// A fee of exactly 300 takes the percentage branch.
const SMALL_ORDER_CUTOFF: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Flat admin share for small orders.
const FLAT_ADMIN_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Admin share rate for orders at or above the cutoff (10%).
const ADMIN_FEE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// One raw delivery record as reported by the rider.
///
/// Wire field names match the mobile client payload: `fee` is the delivery
/// fee, `comm` the restaurant commission, `svc` the service charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub fee: Decimal,
    pub comm: Decimal,
    pub svc: Decimal,
}

/// A delivery record echoed back with its computed admin shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedRecord {
    pub fee: Decimal,
    pub comm: Decimal,
    pub svc: Decimal,
    pub admin_fee: Decimal,
    pub admin_svc: Decimal,
}

/// Sheet-level reconciliation result.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetComputation {
    pub records: Vec<ComputedRecord>,
    pub total_delivery_fee: Decimal,
    pub total_restaurant_comm: Decimal,
    pub total_service_charge: Decimal,
    pub admin_comm_delivery: Decimal,
    pub admin_comm_service: Decimal,
    pub admin_comm_restaurant: Decimal,
    pub admin_commission: Decimal,
    pub gross_earnings: Decimal,
    pub actual_earnings: Decimal,
}

/// Admin share of a single delivery fee.
///
/// Small orders (fee < 300) pay a flat 10; everything else pays 10%.
fn admin_fee_share(fee: Decimal) -> Decimal {
    if fee < SMALL_ORDER_CUTOFF {
        FLAT_ADMIN_FEE
    } else {
        fee * ADMIN_FEE_RATE
    }
}

/// Admin share of a single service charge.
///
/// Fixed tier table; a service charge outside the table contributes zero
/// admin share but still counts toward the gross totals.
fn admin_service_share(svc: Decimal) -> Decimal {
    for (tier, share) in [(50i64, 25i64), (80, 25), (120, 60), (180, 100)] {
        if svc == Decimal::from(tier) {
            return Decimal::from(share);
        }
    }
    Decimal::ZERO
}

/// Reconcile one day's raw delivery records into per-record admin shares and
/// sheet aggregates.
///
/// The derived aggregates follow the settlement rules:
/// - `admin_commission` is the admin fee share plus the admin service-charge
///   share plus the *entire* restaurant commission (the platform captures the
///   restaurant's cut in full).
/// - `actual_earnings` is what the rider keeps: the fee and service charge
///   net of admin shares. Restaurant commission is excluded entirely because
///   the rider never owned that money.
/// - `gross_earnings` is the informational total of cash that passed through
///   the rider's hands.
pub fn reconcile(records: &[DeliveryRecord]) -> SheetComputation {
    let mut total_delivery_fee = Decimal::ZERO;
    let mut total_restaurant_comm = Decimal::ZERO;
    let mut total_service_charge = Decimal::ZERO;
    let mut admin_comm_delivery = Decimal::ZERO;
    let mut admin_comm_service = Decimal::ZERO;

    let mut computed = Vec::with_capacity(records.len());

    for record in records {
        let admin_fee = admin_fee_share(record.fee);
        let admin_svc = admin_service_share(record.svc);

        total_delivery_fee += record.fee;
        total_restaurant_comm += record.comm;
        total_service_charge += record.svc;
        admin_comm_delivery += admin_fee;
        admin_comm_service += admin_svc;

        computed.push(ComputedRecord {
            fee: record.fee,
            comm: record.comm,
            svc: record.svc,
            admin_fee,
            admin_svc,
        });
    }

    let admin_commission = admin_comm_delivery + admin_comm_service + total_restaurant_comm;
    let actual_earnings = (total_delivery_fee - admin_comm_delivery)
        + (total_service_charge - admin_comm_service);
    let gross_earnings = total_delivery_fee + total_service_charge + total_restaurant_comm;

    SheetComputation {
        records: computed,
        total_delivery_fee,
        total_restaurant_comm,
        total_service_charge,
        admin_comm_delivery,
        admin_comm_service,
        admin_comm_restaurant: total_restaurant_comm,
        admin_commission,
        gross_earnings,
        actual_earnings,
    }
}
