//! Sale records.
//!
//! A sale is created by the external order-submission surface and reaches the
//! console as a snapshot record. The console mutates it only through the
//! lifecycle writes in [`crate::lifecycle`]; `sale_date` is immutable for the
//! sale's whole life.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use affilia_core::{BundleId, Money, ProductId, SaleId, UserId, VariantId};

use crate::status::SaleStatus;

/// Structured shipping address, stored in the original system's snake_case
/// wire columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "customer_street_address", default)]
    pub street: String,
    #[serde(rename = "customer_house_number", default)]
    pub house_number: String,
    #[serde(rename = "customer_city", default)]
    pub city: String,
    #[serde(rename = "customer_province", default)]
    pub province: String,
    #[serde(rename = "customer_zip", default)]
    pub zip: String,
}

/// One entry in a sale's append-only contact log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEvent {
    pub at: DateTime<Utc>,
    pub actor_id: UserId,
    pub actor_name: String,
    /// Channel or outcome of the attempt ("chiamata", "whatsapp", "no risposta").
    pub outcome: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// One customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub affiliate_id: UserId,
    #[serde(default)]
    pub affiliate_name: String,
    #[serde(default)]
    pub bundle_id: Option<BundleId>,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Total charged to the customer.
    pub sale_amount: Money,
    /// The affiliate's cut for this sale.
    pub commission_amount: Money,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub status: SaleStatus,
    #[serde(default)]
    pub status_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_contacted_by: Option<UserId>,
    #[serde(default)]
    pub last_contacted_by_name: Option<String>,
    /// Synthetic bookkeeping entry (manual bonus or debit). Never revenue,
    /// never duplicate-checked.
    #[serde(default)]
    pub is_bonus: bool,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(flatten)]
    pub address: Address,
    /// Traffic-source tag supplied by the affiliate's funnel.
    #[serde(default)]
    pub sub_id: String,
    /// Creation timestamp. Immutable.
    pub sale_date: DateTime<Utc>,
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact_history: Vec<ContactEvent>,
}

fn default_quantity() -> u32 {
    1
}

impl Sale {
    /// Whether this sale contributes to revenue figures.
    pub fn counts_revenue(&self) -> bool {
        !self.is_bonus && self.status.counts_revenue()
    }

    /// Whether the affiliate commission on this sale is payable.
    /// Bonus entries are always pre-approved, whatever their status.
    pub fn commission_approved(&self) -> bool {
        self.is_bonus || self.status.affiliate_commission_approved()
    }

    /// Whether the affiliate commission on this sale is still maturing.
    pub fn commission_pending(&self) -> bool {
        !self.is_bonus && self.status.affiliate_commission_pending()
    }

    /// Whether the sale counts in leaderboard/approval-rate tallies.
    pub fn counts_in_totals(&self) -> bool {
        !self.is_bonus && !self.status.excluded_from_counts()
    }
}
