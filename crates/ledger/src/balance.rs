//! Balance derivation.
//!
//! Balances are never stored. Each one is re-derived from the full sale and
//! transaction snapshots, so the ledger cannot drift from its sources:
//!
//! `balance = earned commissions + transfers in + adjustments − transfers out − payouts`
//!
//! Only `Completed` transactions count. Customer-care operators earn the
//! product's care commission on delivered sales they last contacted; every
//! other balance-carrying role earns `commissionAmount` on its own approved
//! or bonus sales.

use std::collections::HashMap;

use affilia_auth::{Role, User};
use affilia_catalog::{find_product, Product};
use affilia_core::{Money, UserId};
use affilia_sales::{Sale, SaleStatus};

use crate::transaction::Transaction;

/// A balance as seen by sufficiency checks. Admin has no ceiling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EffectiveBalance {
    Limited(Money),
    Unlimited,
}

impl EffectiveBalance {
    pub fn covers(self, amount: Money) -> bool {
        match self {
            EffectiveBalance::Unlimited => true,
            EffectiveBalance::Limited(balance) => balance >= amount,
        }
    }
}

/// Commission earned by a user from the sale snapshot alone.
pub fn earned_commissions(user: &User, sales: &[Sale], products: &[Product]) -> Money {
    match user.role {
        Role::CustomerCare => Money::total(
            sales
                .iter()
                .filter(|s| {
                    s.last_contacted_by.as_ref() == Some(&user.id)
                        && s.status == SaleStatus::Consegnato
                })
                .map(|s| {
                    find_product(products, &s.product_id)
                        .map(|p| p.customer_care_commission)
                        .unwrap_or(Money::ZERO)
                }),
        ),
        _ => Money::total(
            sales
                .iter()
                .filter(|s| s.affiliate_id == user.id && s.commission_approved())
                .map(|s| s.commission_amount),
        ),
    }
}

/// Current balance of one user: earned commissions plus completed
/// transaction effects.
pub fn balance_for(
    user: &User,
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
) -> Money {
    earned_commissions(user, sales, products)
        + Money::total(transactions.iter().map(|t| t.effect_on(&user.id)))
}

/// Balances for every balance-carrying user in the snapshot.
pub fn balances(
    users: &[User],
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
) -> HashMap<UserId, Money> {
    users
        .iter()
        .filter(|u| u.role.carries_balance())
        .map(|u| (u.id.clone(), balance_for(u, sales, transactions, products)))
        .collect()
}

/// The balance used for sufficiency checks, or `None` for roles without a
/// balance concept (Logistics).
pub fn effective_balance(
    user: &User,
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
) -> Option<EffectiveBalance> {
    if user.role.unlimited_balance() {
        Some(EffectiveBalance::Unlimited)
    } else if user.role.carries_balance() {
        Some(EffectiveBalance::Limited(balance_for(
            user,
            sales,
            transactions,
            products,
        )))
    } else {
        None
    }
}

/// Sum of the user's payouts still awaiting settlement. Reserved against the
/// balance when validating a new payout request.
pub fn pending_payouts_for(transactions: &[Transaction], user: &UserId) -> Money {
    Money::total(
        transactions
            .iter()
            .filter(|t| t.is_pending_payout_of(user))
            .map(|t| t.amount),
    )
}
