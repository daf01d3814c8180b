//! Role model for the operations console.
//!
//! Roles form a closed set; every role-specific rule in the workspace is a
//! total function or a static table over this enum, so a new role variant
//! fails compilation at every site that must consider it.

use serde::{Deserialize, Serialize};

/// Console role. Determines sale visibility, legal status transitions,
/// balance semantics, and commission eligibility.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Affiliate,
    Logistics,
    CustomerCare,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Affiliate,
        Role::Logistics,
        Role::CustomerCare,
    ];

    /// Whether the role has a computed ledger balance.
    ///
    /// Admin is excluded here: its effective balance is unlimited, a sentinel
    /// rather than a number (see the ledger crate). Logistics has no balance
    /// concept at all.
    pub const fn carries_balance(self) -> bool {
        matches!(self, Role::Affiliate | Role::Manager | Role::CustomerCare)
    }

    /// Whether sufficiency checks against this role always pass.
    pub const fn unlimited_balance(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether a status transition by this role stamps the actor as the
    /// sale's last contact. Logistics actors intentionally do not.
    pub const fn stamps_contact(self) -> bool {
        !matches!(self, Role::Logistics)
    }

    /// Whether the role sees platform-wide sales. Affiliates see only their
    /// own.
    pub const fn sees_all_sales(self) -> bool {
        !matches!(self, Role::Affiliate)
    }

    /// Whether a ticket reply by this role moves the ticket into processing.
    pub const fn is_support_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Affiliate => "Affiliate",
            Role::Logistics => "Logistics",
            Role::CustomerCare => "Customer Care",
        };
        f.write_str(label)
    }
}
