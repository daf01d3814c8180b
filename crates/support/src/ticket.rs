//! Support tickets.
//!
//! A ticket belongs to the user who opened it and carries an append-only
//! reply thread. A reply from support staff moves the ticket to
//! `In Lavorazione` automatically, even when it had been closed; every other
//! author leaves the status alone. Operations validate against the snapshot
//! and return writes; the appliers mirror them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use affilia_auth::{Role, User};
use affilia_core::{DomainError, DomainResult, ReplyId, TicketId, UserId};

/// Working state of a ticket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Aperto,
    #[serde(rename = "In Lavorazione")]
    InLavorazione,
    Chiuso,
}

impl TicketStatus {
    pub const fn is_open(self) -> bool {
        !matches!(self, TicketStatus::Chiuso)
    }
}

impl core::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TicketStatus::Aperto => "Aperto",
            TicketStatus::InLavorazione => "In Lavorazione",
            TicketStatus::Chiuso => "Chiuso",
        })
    }
}

/// One message appended to a ticket's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReply {
    pub id: ReplyId,
    pub ticket_id: TicketId,
    pub user_id: UserId,
    pub user_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A support request opened by any console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: Role,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<TicketReply>,
}

impl Ticket {
    /// Whether the thread is waiting on `user`: still open, and the last
    /// word in it was someone else's.
    pub fn awaiting_reader(&self, user: &UserId) -> bool {
        self.status.is_open() && self.replies.last().is_some_and(|r| &r.user_id != user)
    }
}

fn find_ticket<'a>(tickets: &'a [Ticket], id: &TicketId) -> DomainResult<&'a Ticket> {
    tickets
        .iter()
        .find(|t| &t.id == id)
        .ok_or_else(|| DomainError::not_found(format!("ticket {id}")))
}

fn non_empty(field: &'static str, value: String) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is empty")));
    }
    Ok(value)
}

/// Open a new ticket. Born `Aperto` with an empty thread.
pub fn open_ticket(
    owner: &User,
    subject: impl Into<String>,
    message: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<Ticket> {
    let subject = non_empty("subject", subject.into())?;
    let message = non_empty("message", message.into())?;

    let ticket = Ticket {
        id: TicketId::new(),
        user_id: owner.id.clone(),
        user_name: owner.name.clone(),
        user_role: owner.role,
        subject,
        message,
        status: TicketStatus::Aperto,
        created_at: at,
        updated_at: at,
        replies: Vec::new(),
    };
    tracing::info!(ticket = %ticket.id, owner = %owner.id, "ticket opened");
    Ok(ticket)
}

/// A validated reply plus the status the ticket moves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyWrite {
    pub reply: TicketReply,
    pub status: TicketStatus,
    pub updated_at: DateTime<Utc>,
}

/// Append a reply. Support staff replies pull the ticket into
/// `In Lavorazione`; anyone else leaves the status untouched.
pub fn reply_to_ticket(
    tickets: &[Ticket],
    ticket_id: &TicketId,
    author: &User,
    message: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<ReplyWrite> {
    let ticket = find_ticket(tickets, ticket_id)?;
    let message = non_empty("message", message.into())?;

    let status = if author.role.is_support_staff() {
        TicketStatus::InLavorazione
    } else {
        ticket.status
    };

    Ok(ReplyWrite {
        reply: TicketReply {
            id: ReplyId::new(),
            ticket_id: ticket.id.clone(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            message,
            created_at: at,
        },
        status,
        updated_at: at,
    })
}

/// An explicit status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketStatusWrite {
    pub ticket_id: TicketId,
    pub status: TicketStatus,
    pub updated_at: DateTime<Utc>,
}

/// Set a ticket's status directly. Support staff only.
pub fn set_ticket_status(
    tickets: &[Ticket],
    ticket_id: &TicketId,
    actor: &User,
    status: TicketStatus,
    at: DateTime<Utc>,
) -> DomainResult<TicketStatusWrite> {
    if !actor.role.is_support_staff() {
        return Err(DomainError::unauthorized(format!(
            "{} cannot set ticket statuses",
            actor.role
        )));
    }
    let ticket = find_ticket(tickets, ticket_id)?;
    Ok(TicketStatusWrite {
        ticket_id: ticket.id.clone(),
        status,
        updated_at: at,
    })
}

/// Mirror a reply write onto the snapshot.
pub fn apply_reply(tickets: &mut [Ticket], write: ReplyWrite) {
    if let Some(ticket) = tickets.iter_mut().find(|t| t.id == write.reply.ticket_id) {
        ticket.status = write.status;
        ticket.updated_at = write.updated_at;
        ticket.replies.push(write.reply);
    }
}

/// Mirror a status write onto the snapshot.
pub fn apply_ticket_status(tickets: &mut [Ticket], write: &TicketStatusWrite) {
    if let Some(ticket) = tickets.iter_mut().find(|t| t.id == write.ticket_id) {
        ticket.status = write.status;
        ticket.updated_at = write.updated_at;
    }
}

/// Items needing attention on the assistance screen.
///
/// Admin watches the whole `Aperto` queue. A manager watches affiliate
/// tickets plus answers to their own. Everyone else only their own threads
/// where the last reply came from someone else.
pub fn assistance_badge(tickets: &[Ticket], user: &User) -> usize {
    match user.role {
        Role::Admin => tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Aperto)
            .count(),
        Role::Manager => {
            let affiliate_open = tickets
                .iter()
                .filter(|t| t.user_role == Role::Affiliate && t.status == TicketStatus::Aperto)
                .count();
            let own_answered = tickets
                .iter()
                .filter(|t| t.user_id == user.id && t.awaiting_reader(&user.id))
                .count();
            affiliate_open + own_answered
        }
        _ => tickets
            .iter()
            .filter(|t| t.user_id == user.id && t.awaiting_reader(&user.id))
            .count(),
    }
}

/// Tickets still open, optionally restricted to one owner.
pub fn open_ticket_count(tickets: &[Ticket], owner: Option<&UserId>) -> usize {
    tickets
        .iter()
        .filter(|t| t.status.is_open() && owner.map_or(true, |o| &t.user_id == o))
        .count()
}
