//! `affilia-support` — notification fan-out and the assistance desk.
//!
//! Notifications broadcast to roles and track per-user read state on the
//! record; tickets carry an append-only reply thread with status side
//! effects on staff replies.

pub mod notification;
pub mod ticket;

pub use notification::{
    create_notification, mark_all_read, mark_read, unread_count, visible_notifications,
    Notification,
};
pub use ticket::{
    apply_reply, apply_ticket_status, assistance_badge, open_ticket, open_ticket_count,
    reply_to_ticket, set_ticket_status, ReplyWrite, Ticket, TicketReply, TicketStatus,
    TicketStatusWrite,
};
