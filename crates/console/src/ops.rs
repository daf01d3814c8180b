//! Write application.
//!
//! A snapshot changes only through these entry points. Each one runs the
//! domain operation against the current snapshot, mirrors the returned
//! write(s) onto it, and stops there: the caller rebuilds the view to pick
//! up everything the write implies.
//!
//! Balance-checked operations validate against the annotated sale set, the
//! same one the view folds, so a duplicate-flagged commission can never back
//! a payout.

use chrono::{DateTime, Utc};

use affilia_auth::{Role, User};
use affilia_core::{
    DomainError, DomainResult, Money, NotificationId, SaleId, TicketId, TransactionId, UserId,
};
use affilia_ledger::{
    admin_transfer_funds, apply_settlement, approve_payout, grant_adjustment, grant_bonus,
    reject_payout, request_payout, transfer_funds, PaymentMethod,
};
use affilia_sales::{
    annotate, apply_address, apply_contact_log, apply_contact_update, apply_notes, apply_status,
    contact_update, log_contact, update_address, update_notes, update_status, Address,
    ContactEvent, SaleStatus,
};
use affilia_support::{
    apply_reply, apply_ticket_status, create_notification, mark_all_read, mark_read, open_ticket,
    reply_to_ticket, set_ticket_status, TicketStatus,
};

use crate::snapshot::Snapshot;

fn sale_index(snapshot: &Snapshot, id: &SaleId) -> DomainResult<usize> {
    snapshot
        .sales
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| DomainError::not_found(format!("sale {id}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Sale lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Manual status transition on one sale.
pub fn change_sale_status(
    snapshot: &mut Snapshot,
    actor: &User,
    sale_id: &SaleId,
    status: SaleStatus,
    tracking_code: Option<&str>,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let idx = sale_index(snapshot, sale_id)?;
    let write = update_status(&snapshot.sales[idx], actor, status, tracking_code, at)?;
    apply_status(&mut snapshot.sales[idx], &write);
    Ok(())
}

/// One contact round: transition, replace the notes, append the attempt to
/// the contact history.
pub fn record_contact_outcome(
    snapshot: &mut Snapshot,
    actor: &User,
    sale_id: &SaleId,
    status: SaleStatus,
    outcome: impl Into<String>,
    notes: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let idx = sale_index(snapshot, sale_id)?;
    let notes = notes.into();
    let write = contact_update(&snapshot.sales[idx], actor, status, notes.clone(), at)?;
    let log = log_contact(
        &snapshot.sales[idx],
        ContactEvent {
            at,
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            outcome: outcome.into(),
            note: (!notes.trim().is_empty()).then_some(notes),
        },
    );
    apply_contact_update(&mut snapshot.sales[idx], &write);
    apply_contact_log(&mut snapshot.sales[idx], &log);
    Ok(())
}

/// Replace a sale's operator notes.
pub fn edit_sale_notes(
    snapshot: &mut Snapshot,
    actor: &User,
    sale_id: &SaleId,
    notes: impl Into<String>,
) -> DomainResult<()> {
    let idx = sale_index(snapshot, sale_id)?;
    let write = update_notes(&snapshot.sales[idx], actor, notes);
    apply_notes(&mut snapshot.sales[idx], &write);
    Ok(())
}

/// Replace a sale's shipping address.
pub fn edit_sale_address(
    snapshot: &mut Snapshot,
    actor: &User,
    sale_id: &SaleId,
    address: Address,
) -> DomainResult<()> {
    let idx = sale_index(snapshot, sale_id)?;
    let write = update_address(&snapshot.sales[idx], actor, address);
    apply_address(&mut snapshot.sales[idx], &write);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger
// ─────────────────────────────────────────────────────────────────────────────

/// Record a payout request as a pending transaction.
pub fn submit_payout_request(
    snapshot: &mut Snapshot,
    user_id: &UserId,
    amount: Money,
    payment_method: PaymentMethod,
    payment_details: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<TransactionId> {
    let users = snapshot.users();
    let sales = annotate(&snapshot.sales);
    let tx = request_payout(
        &users,
        &sales,
        &snapshot.transactions,
        &snapshot.products,
        user_id,
        amount,
        payment_method,
        payment_details,
        at,
    )?;
    let id = tx.id.clone();
    snapshot.transactions.push(tx);
    Ok(id)
}

/// Resolve a pending payout. Admin only.
pub fn settle_payout(
    snapshot: &mut Snapshot,
    actor: &User,
    id: &TransactionId,
    approve: bool,
) -> DomainResult<()> {
    if actor.role != Role::Admin {
        return Err(DomainError::unauthorized(format!(
            "role {} may not settle payouts",
            actor.role
        )));
    }
    let write = if approve {
        approve_payout(&snapshot.transactions, id)?
    } else {
        reject_payout(&snapshot.transactions, id)?
    };
    apply_settlement(&mut snapshot.transactions, &write);
    Ok(())
}

/// Move funds from the caller's balance to another account.
pub fn send_transfer(
    snapshot: &mut Snapshot,
    from_user_id: &UserId,
    to_user_id: &UserId,
    amount: Money,
    notes: Option<String>,
    at: DateTime<Utc>,
) -> DomainResult<TransactionId> {
    let users = snapshot.users();
    let sales = annotate(&snapshot.sales);
    let tx = transfer_funds(
        &users,
        &sales,
        &snapshot.transactions,
        &snapshot.products,
        from_user_id,
        to_user_id,
        amount,
        notes,
        at,
    )?;
    let id = tx.id.clone();
    snapshot.transactions.push(tx);
    Ok(id)
}

/// Admin-initiated transfer between two other accounts.
pub fn send_admin_transfer(
    snapshot: &mut Snapshot,
    actor: &User,
    from_user_id: &UserId,
    to_user_id: &UserId,
    amount: Money,
    at: DateTime<Utc>,
) -> DomainResult<TransactionId> {
    let users = snapshot.users();
    let sales = annotate(&snapshot.sales);
    let tx = admin_transfer_funds(
        &users,
        &sales,
        &snapshot.transactions,
        &snapshot.products,
        actor,
        from_user_id,
        to_user_id,
        amount,
        at,
    )?;
    let id = tx.id.clone();
    snapshot.transactions.push(tx);
    Ok(id)
}

/// Grant a manual bonus; the credit (and a Manager's mirrored debit) land in
/// the sale set.
pub fn award_bonus(
    snapshot: &mut Snapshot,
    actor: &User,
    recipient_id: &UserId,
    amount: Money,
    notes: &str,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let users = snapshot.users();
    let sales = annotate(&snapshot.sales);
    let grant = grant_bonus(
        &users,
        &sales,
        &snapshot.transactions,
        &snapshot.products,
        actor,
        recipient_id,
        amount,
        notes,
        at,
    )?;
    snapshot.sales.push(grant.credit);
    if let Some(debit) = grant.debit {
        snapshot.sales.push(debit);
    }
    Ok(())
}

/// Admin balance credit outside the commission flow.
pub fn award_adjustment(
    snapshot: &mut Snapshot,
    actor: &User,
    recipient_id: &UserId,
    amount: Money,
    at: DateTime<Utc>,
) -> DomainResult<TransactionId> {
    let users = snapshot.users();
    let tx = grant_adjustment(&users, actor, recipient_id, amount, at)?;
    let id = tx.id.clone();
    snapshot.transactions.push(tx);
    Ok(id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications and tickets
// ─────────────────────────────────────────────────────────────────────────────

/// Broadcast a notification to one or more roles.
pub fn broadcast_notification(
    snapshot: &mut Snapshot,
    title: impl Into<String>,
    message: impl Into<String>,
    target_roles: Vec<Role>,
    event_type: Option<String>,
    link_to: Option<String>,
    at: DateTime<Utc>,
) -> NotificationId {
    let notification = create_notification(title, message, target_roles, event_type, link_to, at);
    let id = notification.id.clone();
    snapshot.notifications.push(notification);
    id
}

/// Mark one notification read. Returns whether the record changed.
pub fn read_notification(
    snapshot: &mut Snapshot,
    user: &UserId,
    id: &NotificationId,
) -> DomainResult<bool> {
    let notification = snapshot
        .notifications
        .iter_mut()
        .find(|n| &n.id == id)
        .ok_or_else(|| DomainError::not_found(format!("notification {id}")))?;
    Ok(mark_read(notification, user))
}

/// Mark everything the user can see as read. Returns how many changed.
pub fn read_all_notifications(snapshot: &mut Snapshot, user: &User) -> usize {
    mark_all_read(&mut snapshot.notifications, user)
}

/// Open a new assistance ticket.
pub fn submit_ticket(
    snapshot: &mut Snapshot,
    owner: &User,
    subject: impl Into<String>,
    message: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<TicketId> {
    let ticket = open_ticket(owner, subject, message, at)?;
    let id = ticket.id.clone();
    snapshot.tickets.push(ticket);
    Ok(id)
}

/// Append a reply to a ticket thread.
pub fn submit_ticket_reply(
    snapshot: &mut Snapshot,
    ticket_id: &TicketId,
    author: &User,
    message: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let write = reply_to_ticket(&snapshot.tickets, ticket_id, author, message, at)?;
    apply_reply(&mut snapshot.tickets, write);
    Ok(())
}

/// Set a ticket's status directly. Support staff only.
pub fn change_ticket_status(
    snapshot: &mut Snapshot,
    ticket_id: &TicketId,
    actor: &User,
    status: TicketStatus,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let write = set_ticket_status(&snapshot.tickets, ticket_id, actor, status, at)?;
    apply_ticket_status(&mut snapshot.tickets, &write);
    Ok(())
}
