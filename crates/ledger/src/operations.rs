//! Ledger operations.
//!
//! Every operation validates against the current snapshot and returns the
//! record(s) to persist; nothing here mutates state. Unknown user references
//! are hard failures, unlike the aggregation paths where missing records
//! degrade to zero.
//!
//! # Invariants
//! - A payout request reserves against `balance − pending payouts`.
//! - Transfers check the named source's balance only; an Admin moving funds
//!   between two other users never spends their own.
//! - A Manager bonus is balance-neutral platform-wide (credit plus debit);
//!   an Admin bonus debits no one.
//! - Settlement is one-shot: a settled transaction never changes again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use affilia_auth::{Role, User};
use affilia_catalog::{Product, BONUS_DEBIT_PRODUCT, BONUS_PRODUCT};
use affilia_core::{DomainError, DomainResult, Money, ProductId, SaleId, TransactionId, UserId};
use affilia_sales::{Address, Sale, SaleStatus};

use crate::balance::{effective_balance, pending_payouts_for, EffectiveBalance};
use crate::transaction::{PaymentMethod, Transaction, TransactionKind, TransactionStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Validation helpers
// ─────────────────────────────────────────────────────────────────────────────

fn find_user<'a>(users: &'a [User], id: &UserId) -> DomainResult<&'a User> {
    users
        .iter()
        .find(|u| &u.id == id)
        .ok_or_else(|| DomainError::not_found(format!("user {id}")))
}

fn ensure_positive(amount: Money) -> DomainResult<()> {
    if !amount.is_positive() {
        return Err(DomainError::validation("amount must be positive"));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Payout requests
// ─────────────────────────────────────────────────────────────────────────────

/// Request a payout of earned commission.
///
/// The request is validated against the user's balance minus the payouts
/// already awaiting settlement, then recorded as `Pending` until an admin
/// settles it.
pub fn request_payout(
    users: &[User],
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
    user_id: &UserId,
    amount: Money,
    payment_method: PaymentMethod,
    payment_details: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<Transaction> {
    ensure_positive(amount)?;
    let user = find_user(users, user_id)?;

    let Some(EffectiveBalance::Limited(balance)) =
        effective_balance(user, sales, transactions, products)
    else {
        return Err(DomainError::validation(format!(
            "role {} has no payable balance",
            user.role
        )));
    };

    let available = balance - pending_payouts_for(transactions, user_id);
    if amount > available {
        tracing::warn!(user = %user_id, %amount, %available, "payout request over available balance");
        return Err(DomainError::validation(
            "insufficient balance for this request, counting payouts still pending",
        ));
    }

    tracing::info!(user = %user_id, %amount, method = %payment_method, "payout requested");

    Ok(Transaction {
        id: TransactionId::new(),
        amount,
        status: TransactionStatus::Pending,
        created_at: at,
        kind: TransactionKind::Payout {
            user_id: user.id.clone(),
            payment_method,
            payment_details: payment_details.into(),
        },
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Transfers
// ─────────────────────────────────────────────────────────────────────────────

fn transfer_transaction(
    from: &User,
    to: &User,
    amount: Money,
    notes: Option<String>,
    at: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        amount,
        status: TransactionStatus::Completed,
        created_at: at,
        kind: TransactionKind::Transfer {
            from_user_id: from.id.clone(),
            from_user_name: from.name.clone(),
            to_user_id: to.id.clone(),
            to_user_name: to.name.clone(),
            notes,
        },
    }
}

/// Move funds from the caller's own balance to another user.
pub fn transfer_funds(
    users: &[User],
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
    from_user_id: &UserId,
    to_user_id: &UserId,
    amount: Money,
    notes: Option<String>,
    at: DateTime<Utc>,
) -> DomainResult<Transaction> {
    ensure_positive(amount)?;
    let from = find_user(users, from_user_id)?;
    let to = find_user(users, to_user_id)?;

    let sufficient = effective_balance(from, sales, transactions, products)
        .is_some_and(|b| b.covers(amount));
    if !sufficient {
        tracing::warn!(from = %from_user_id, %amount, "transfer over source balance");
        return Err(DomainError::validation("insufficient balance"));
    }

    tracing::info!(from = %from_user_id, to = %to_user_id, %amount, "funds transferred");
    Ok(transfer_transaction(from, to, amount, notes, at))
}

/// Admin-initiated transfer between two other users. Only the named source's
/// balance is checked; the acting admin's funds are never touched.
pub fn admin_transfer_funds(
    users: &[User],
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
    actor: &User,
    from_user_id: &UserId,
    to_user_id: &UserId,
    amount: Money,
    at: DateTime<Utc>,
) -> DomainResult<Transaction> {
    if actor.role != Role::Admin {
        return Err(DomainError::unauthorized(format!(
            "role {} may not move other users' funds",
            actor.role
        )));
    }
    ensure_positive(amount)?;
    let from = find_user(users, from_user_id)?;
    let to = find_user(users, to_user_id)?;

    // Roles without a balance are treated as holding zero.
    let source = effective_balance(from, sales, transactions, products)
        .unwrap_or(EffectiveBalance::Limited(Money::ZERO));
    if !source.covers(amount) {
        return Err(DomainError::validation("insufficient source balance"));
    }

    tracing::info!(actor = %actor.id, from = %from_user_id, to = %to_user_id, %amount, "admin transfer");
    Ok(transfer_transaction(from, to, amount, None, at))
}

// ─────────────────────────────────────────────────────────────────────────────
// Bonuses and adjustments
// ─────────────────────────────────────────────────────────────────────────────

/// The synthetic sale records produced by a bonus grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusGrant {
    /// Credit entry on the recipient's balance.
    pub credit: Sale,
    /// Debit entry against a Manager grantor. Absent for Admin grants.
    pub debit: Option<Sale>,
}

fn bonus_sale(id: SaleId, product_id: &str, recipient: &User, amount: Money, at: DateTime<Utc>) -> Sale {
    Sale {
        id,
        product_id: ProductId::from(product_id),
        product_name: String::new(),
        affiliate_id: recipient.id.clone(),
        affiliate_name: recipient.name.clone(),
        bundle_id: None,
        variant_id: None,
        sale_amount: Money::ZERO,
        commission_amount: amount,
        quantity: 1,
        status: SaleStatus::Consegnato,
        status_updated_at: None,
        last_contacted_by: None,
        last_contacted_by_name: None,
        is_bonus: true,
        customer_name: String::new(),
        customer_phone: String::new(),
        customer_email: recipient.email.clone(),
        address: Address::default(),
        sub_id: "manuale".to_string(),
        sale_date: at,
        tracking_code: None,
        notes: None,
        contact_history: Vec::new(),
    }
}

/// Grant a manual bonus to a balance-carrying user.
///
/// The credit is a pre-approved synthetic sale, so it flows through the same
/// balance derivation as real commissions. A Manager grantor pays out of
/// their own balance via a mirrored debit sale; an Admin grantor debits
/// no one.
pub fn grant_bonus(
    users: &[User],
    sales: &[Sale],
    transactions: &[Transaction],
    products: &[Product],
    actor: &User,
    recipient_id: &UserId,
    amount: Money,
    notes: &str,
    at: DateTime<Utc>,
) -> DomainResult<BonusGrant> {
    if !matches!(actor.role, Role::Admin | Role::Manager) {
        return Err(DomainError::unauthorized(format!(
            "role {} may not grant bonuses",
            actor.role
        )));
    }
    ensure_positive(amount)?;
    let recipient = find_user(users, recipient_id)?;
    if !recipient.role.carries_balance() {
        return Err(DomainError::validation(format!(
            "role {} cannot receive a bonus",
            recipient.role
        )));
    }

    if actor.role == Role::Manager {
        let own = effective_balance(actor, sales, transactions, products)
            .unwrap_or(EffectiveBalance::Limited(Money::ZERO));
        if !own.covers(amount) {
            return Err(DomainError::validation("insufficient balance for the bonus"));
        }
    }

    let mut credit = bonus_sale(SaleId::bonus(), BONUS_PRODUCT, recipient, amount, at);
    credit.product_name = "Bonus Manuale".to_string();
    credit.notes = Some(
        format!("Bonus aggiunto da {}. {notes}", actor.name)
            .trim()
            .to_string(),
    );

    let debit = (actor.role == Role::Manager).then(|| {
        let mut debit = bonus_sale(SaleId::bonus_debit(), BONUS_DEBIT_PRODUCT, actor, -amount, at);
        debit.product_name = format!("Bonus erogato a {}", recipient.name);
        debit.notes = Some(
            format!("Bonus per {}. {notes}", recipient.name)
                .trim()
                .to_string(),
        );
        debit
    });

    tracing::info!(actor = %actor.id, recipient = %recipient_id, %amount, debited = debit.is_some(), "bonus granted");

    Ok(BonusGrant { credit, debit })
}

/// Admin-issued balance credit outside the commission flow.
pub fn grant_adjustment(
    users: &[User],
    actor: &User,
    recipient_id: &UserId,
    amount: Money,
    at: DateTime<Utc>,
) -> DomainResult<Transaction> {
    if actor.role != Role::Admin {
        return Err(DomainError::unauthorized(format!(
            "role {} may not issue adjustments",
            actor.role
        )));
    }
    ensure_positive(amount)?;
    let recipient = find_user(users, recipient_id)?;
    if !recipient.role.carries_balance() {
        return Err(DomainError::validation(format!(
            "role {} cannot receive an adjustment",
            recipient.role
        )));
    }

    tracing::info!(actor = %actor.id, recipient = %recipient_id, %amount, "adjustment issued");

    Ok(Transaction {
        id: TransactionId::new(),
        amount,
        status: TransactionStatus::Completed,
        created_at: at,
        kind: TransactionKind::Adjustment {
            to_user_id: recipient.id.clone(),
        },
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Payout settlement
// ─────────────────────────────────────────────────────────────────────────────

/// Atomic write resolving a pending payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementWrite {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
}

fn settle(
    transactions: &[Transaction],
    id: &TransactionId,
    to: TransactionStatus,
) -> DomainResult<SettlementWrite> {
    let tx = transactions
        .iter()
        .find(|t| &t.id == id)
        .ok_or_else(|| DomainError::not_found(format!("transaction {id}")))?;
    if !tx.is_payout() {
        return Err(DomainError::validation("only payouts are settled"));
    }
    if tx.status.is_settled() {
        return Err(DomainError::invariant("transaction already settled"));
    }

    tracing::info!(transaction = %id, outcome = %to, "payout settled");
    Ok(SettlementWrite {
        transaction_id: id.clone(),
        status: to,
    })
}

/// Resolve a pending payout as paid.
pub fn approve_payout(
    transactions: &[Transaction],
    id: &TransactionId,
) -> DomainResult<SettlementWrite> {
    settle(transactions, id, TransactionStatus::Completed)
}

/// Resolve a pending payout as refused; the reserved amount returns to the
/// requester's available balance.
pub fn reject_payout(
    transactions: &[Transaction],
    id: &TransactionId,
) -> DomainResult<SettlementWrite> {
    settle(transactions, id, TransactionStatus::Failed)
}

pub fn apply_settlement(transactions: &mut [Transaction], write: &SettlementWrite) {
    if let Some(tx) = transactions.iter_mut().find(|t| t.id == write.transaction_id) {
        tx.status = write.status;
    }
}

/// Payouts awaiting settlement, platform-wide or for one requester.
pub fn pending_payout_count(transactions: &[Transaction], owner: Option<&UserId>) -> usize {
    transactions
        .iter()
        .filter(|t| match owner {
            Some(owner) => t.is_pending_payout_of(owner),
            None => t.is_payout() && t.status == TransactionStatus::Pending,
        })
        .count()
}
