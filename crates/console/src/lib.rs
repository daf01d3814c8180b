//! `affilia-console` — the operations console over one application snapshot.
//!
//! The console loads the full working set as one JSON document, derives
//! everything it shows (duplicate flags, balances, badges, reports) and
//! changes state through one narrow surface: run the domain operation,
//! mirror its write onto the snapshot, derive again.

pub mod ops;
pub mod snapshot;
pub mod view;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use ops::{
    award_adjustment, award_bonus, broadcast_notification, change_sale_status,
    change_ticket_status, edit_sale_address, edit_sale_notes, read_all_notifications,
    read_notification, record_contact_outcome, send_admin_transfer, send_transfer, settle_payout,
    submit_payout_request, submit_ticket, submit_ticket_reply,
};
pub use snapshot::Snapshot;
pub use view::ConsoleView;
