//! `affilia-sales` — sale records, lifecycle transitions, and duplicate
//! detection.
//!
//! The crate is pure domain logic: operations validate against role tables
//! and status invariants and produce atomic write payloads; `apply_*`
//! functions mirror those payloads onto in-memory snapshots.

pub mod duplicates;
pub mod lifecycle;
pub mod sale;
pub mod status;

pub use duplicates::{annotate, duplicate_ids};
pub use lifecycle::{
    apply_address, apply_contact_log, apply_contact_update, apply_notes, apply_status,
    contact_update, log_contact, settable_statuses, update_address, update_notes, update_status,
    AddressWrite, ContactLogWrite, ContactStamp, ContactUpdateWrite, NotesWrite, StatusWrite,
};
pub use sale::{Address, ContactEvent, Sale};
pub use status::SaleStatus;
