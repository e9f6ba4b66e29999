pub mod rider_service;
pub mod settlement_service;
pub mod sheet_service;
pub mod wallet_service;
