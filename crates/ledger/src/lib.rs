//! `affilia-ledger` — transaction records, balance derivation, and the
//! payout/transfer/bonus operations.
//!
//! Balances are derived, never stored: every figure is recomputed from the
//! sale and transaction snapshots. Operations validate and return records to
//! persist; appliers are the only mutation points.

pub mod balance;
pub mod operations;
pub mod transaction;

pub use balance::{
    balance_for, balances, earned_commissions, effective_balance, pending_payouts_for,
    EffectiveBalance,
};
pub use operations::{
    admin_transfer_funds, apply_settlement, approve_payout, grant_adjustment, grant_bonus,
    pending_payout_count, reject_payout, request_payout, transfer_funds, BonusGrant,
    SettlementWrite,
};
pub use transaction::{PaymentMethod, Transaction, TransactionKind, TransactionStatus};
