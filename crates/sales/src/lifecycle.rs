//! Role-gated sale lifecycle transitions.
//!
//! Validation happens here, in the core, not in the edit UI: a transition is
//! checked against the actor's role table, the tracking-code contract, and
//! the system-assigned statuses before any write payload is produced. Each
//! operation returns the single atomic record write the persistence
//! collaborator must apply; the matching `apply_*` function mirrors that
//! write onto an in-memory snapshot.
//!
//! # Invariants
//! - `Duplicato` and `Test` are never a legal manual target.
//! - `Spedito` requires a non-empty tracking code; any other target clears it.
//! - Every transition stamps `status_updated_at`; the actor is stamped as the
//!   last contact except for Logistics actors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use affilia_auth::{Role, User};
use affilia_core::{DomainError, DomainResult, SaleId, UserId};

use crate::sale::{Address, ContactEvent, Sale};
use crate::status::SaleStatus;

// ─────────────────────────────────────────────────────────────────────────────
// Role transition tables
// ─────────────────────────────────────────────────────────────────────────────

/// Full manual vocabulary: everything except the system-assigned statuses.
const MANAGEMENT_SETTABLE: &[SaleStatus] = &[
    SaleStatus::InAttesa,
    SaleStatus::Contattato,
    SaleStatus::Confermato,
    SaleStatus::Annullato,
    SaleStatus::Cancellato,
    SaleStatus::Spedito,
    SaleStatus::Svincolato,
    SaleStatus::Consegnato,
    SaleStatus::NonRaggiungibile,
    SaleStatus::NonRitirato,
    SaleStatus::Giacenza,
];

const LOGISTICS_SETTABLE: &[SaleStatus] = &[
    SaleStatus::Confermato,
    SaleStatus::Spedito,
    SaleStatus::Consegnato,
    SaleStatus::Svincolato,
    SaleStatus::NonRitirato,
    SaleStatus::Giacenza,
];

const CUSTOMER_CARE_SETTABLE: &[SaleStatus] = &[
    SaleStatus::InAttesa,
    SaleStatus::Contattato,
    SaleStatus::Confermato,
    SaleStatus::Cancellato,
    SaleStatus::NonRaggiungibile,
    SaleStatus::Giacenza,
];

/// Affiliates are read-only.
const AFFILIATE_SETTABLE: &[SaleStatus] = &[];

/// The statuses a role may set manually.
pub fn settable_statuses(role: Role) -> &'static [SaleStatus] {
    match role {
        Role::Admin | Role::Manager => MANAGEMENT_SETTABLE,
        Role::Logistics => LOGISTICS_SETTABLE,
        Role::CustomerCare => CUSTOMER_CARE_SETTABLE,
        Role::Affiliate => AFFILIATE_SETTABLE,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Last-contact stamp recorded on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStamp {
    pub user_id: UserId,
    pub user_name: String,
}

impl ContactStamp {
    fn for_actor(actor: &User) -> Option<Self> {
        actor.role.stamps_contact().then(|| ContactStamp {
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
        })
    }
}

/// Atomic write for a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusWrite {
    pub sale_id: SaleId,
    pub status: SaleStatus,
    pub status_updated_at: DateTime<Utc>,
    /// Absent for Logistics actors.
    pub contact: Option<ContactStamp>,
    /// Present exactly when shipping; other transitions clear the code.
    pub tracking_code: Option<String>,
}

/// Atomic write for a customer-care contact round: status, notes, stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdateWrite {
    pub status: StatusWrite,
    pub notes: String,
}

/// Atomic write appending one contact-history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLogWrite {
    pub sale_id: SaleId,
    pub entry: ContactEvent,
}

/// Atomic write replacing a sale's operator notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesWrite {
    pub sale_id: SaleId,
    pub notes: String,
    pub contact: Option<ContactStamp>,
}

/// Atomic write replacing a sale's shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressWrite {
    pub sale_id: SaleId,
    pub address: Address,
    pub contact: Option<ContactStamp>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a manual status transition and produce its write.
///
/// `tracking_code` is consulted only for `Spedito`, where it must be
/// non-empty after trimming.
pub fn update_status(
    sale: &Sale,
    actor: &User,
    new_status: SaleStatus,
    tracking_code: Option<&str>,
    at: DateTime<Utc>,
) -> DomainResult<StatusWrite> {
    if new_status.system_assigned() {
        tracing::warn!(sale = %sale.id, status = %new_status, "manual transition to system status rejected");
        return Err(DomainError::invariant(format!(
            "status '{new_status}' is system-assigned"
        )));
    }

    if !settable_statuses(actor.role).contains(&new_status) {
        tracing::warn!(sale = %sale.id, actor = %actor.id, role = %actor.role, status = %new_status, "transition not permitted for role");
        return Err(DomainError::unauthorized(format!(
            "role {} may not set status '{new_status}'",
            actor.role
        )));
    }

    let tracking_code = if new_status == SaleStatus::Spedito {
        let code = tracking_code.map(str::trim).unwrap_or("");
        if code.is_empty() {
            return Err(DomainError::validation(
                "shipping requires a tracking code",
            ));
        }
        Some(code.to_owned())
    } else {
        None
    };

    tracing::info!(sale = %sale.id, from = %sale.status, to = %new_status, actor = %actor.id, "sale status transition");

    Ok(StatusWrite {
        sale_id: sale.id.clone(),
        status: new_status,
        status_updated_at: at,
        contact: ContactStamp::for_actor(actor),
        tracking_code,
    })
}

/// Customer-care contact round: status transition plus notes in one write.
pub fn contact_update(
    sale: &Sale,
    actor: &User,
    new_status: SaleStatus,
    notes: impl Into<String>,
    at: DateTime<Utc>,
) -> DomainResult<ContactUpdateWrite> {
    let status = update_status(sale, actor, new_status, None, at)?;
    Ok(ContactUpdateWrite {
        status,
        notes: notes.into(),
    })
}

/// Append one entry to a sale's contact history.
pub fn log_contact(sale: &Sale, entry: ContactEvent) -> ContactLogWrite {
    ContactLogWrite {
        sale_id: sale.id.clone(),
        entry,
    }
}

/// Replace a sale's operator notes, stamping the actor.
pub fn update_notes(sale: &Sale, actor: &User, notes: impl Into<String>) -> NotesWrite {
    NotesWrite {
        sale_id: sale.id.clone(),
        notes: notes.into(),
        contact: ContactStamp::for_actor(actor),
    }
}

/// Replace a sale's shipping address, stamping the actor.
pub fn update_address(sale: &Sale, actor: &User, address: Address) -> AddressWrite {
    AddressWrite {
        sale_id: sale.id.clone(),
        address,
        contact: ContactStamp::for_actor(actor),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot appliers
// ─────────────────────────────────────────────────────────────────────────────

pub fn apply_status(sale: &mut Sale, write: &StatusWrite) {
    sale.status = write.status;
    sale.status_updated_at = Some(write.status_updated_at);
    sale.tracking_code = write.tracking_code.clone();
    if let Some(contact) = &write.contact {
        sale.last_contacted_by = Some(contact.user_id.clone());
        sale.last_contacted_by_name = Some(contact.user_name.clone());
    }
}

pub fn apply_contact_update(sale: &mut Sale, write: &ContactUpdateWrite) {
    apply_status(sale, &write.status);
    sale.notes = Some(write.notes.clone());
}

pub fn apply_contact_log(sale: &mut Sale, write: &ContactLogWrite) {
    sale.contact_history.push(write.entry.clone());
}

pub fn apply_notes(sale: &mut Sale, write: &NotesWrite) {
    sale.notes = Some(write.notes.clone());
    if let Some(contact) = &write.contact {
        sale.last_contacted_by = Some(contact.user_id.clone());
        sale.last_contacted_by_name = Some(contact.user_name.clone());
    }
}

pub fn apply_address(sale: &mut Sale, write: &AddressWrite) {
    sale.address = write.address.clone();
    if let Some(contact) = &write.contact {
        sale.last_contacted_by = Some(contact.user_id.clone());
        sale.last_contacted_by_name = Some(contact.user_name.clone());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
