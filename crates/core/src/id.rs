//! Strongly-typed identifiers used across the domain.
//!
//! Records arrive from persistence with opaque string identifiers (and a few
//! sentinel product ids are not UUIDs at all), so every id is a thin newtype
//! over `String`. Ids minted inside the core carry a record-type prefix in
//! front of a UUIDv7 so they stay recognizable in logs and exports.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a user (any role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a bundle price tier within a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(String);

/// Identifier of a stock-tracked product variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

/// Identifier of a sale (customer order).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

/// Identifier of a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

/// Identifier of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

/// Identifier of a support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

/// Identifier of a ticket reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, ": empty")));
                }
                Ok(Self(s.to_owned()))
            }
        }
    };
}

macro_rules! impl_minted_id {
    ($t:ty, $prefix:literal) => {
        impl $t {
            /// Mint a new identifier with this record type's prefix.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing ids explicitly in
            /// tests for determinism.
            pub fn new() -> Self {
                Self(format!(concat!($prefix, "{}"), Uuid::now_v7()))
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

impl_string_id!(UserId, "UserId");
impl_string_id!(ProductId, "ProductId");
impl_string_id!(BundleId, "BundleId");
impl_string_id!(VariantId, "VariantId");
impl_string_id!(SaleId, "SaleId");
impl_string_id!(TransactionId, "TransactionId");
impl_string_id!(NotificationId, "NotificationId");
impl_string_id!(TicketId, "TicketId");
impl_string_id!(ReplyId, "ReplyId");

impl_minted_id!(TransactionId, "T-");
impl_minted_id!(NotificationId, "N-");
impl_minted_id!(TicketId, "TICKET-");
impl_minted_id!(ReplyId, "REPLY-");

impl SaleId {
    /// Mint the id for a synthetic bonus credit sale.
    pub fn bonus() -> Self {
        Self(format!("BNS-{}", Uuid::now_v7()))
    }

    /// Mint the id for the manager-side debit of a bonus.
    pub fn bonus_debit() -> Self {
        Self(format!("BNS-DEBIT-{}", Uuid::now_v7()))
    }
}
