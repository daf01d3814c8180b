//! The application snapshot.
//!
//! One JSON document holds the whole working set: catalog, accounts grouped
//! by role, sales, support records and the transaction ledger. Everything
//! else the console shows is derived from this struct on demand; derived
//! values are never written back into it.

use serde::{Deserialize, Serialize};

use affilia_auth::User;
use affilia_catalog::Product;
use affilia_core::UserId;
use affilia_ledger::Transaction;
use affilia_sales::Sale;
use affilia_support::{Notification, Ticket};

/// The full working set, as loaded from one JSON document.
///
/// Accounts arrive pre-partitioned by role; `users` and `find_user` present
/// them as one list where an operation wants the whole directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub admins: Vec<User>,
    #[serde(default)]
    pub managers: Vec<User>,
    #[serde(default)]
    pub affiliates: Vec<User>,
    #[serde(default)]
    pub logistics_users: Vec<User>,
    #[serde(default)]
    pub customer_care_users: Vec<User>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Parse a snapshot document.
    pub fn from_json(json: &str) -> serde_json::Result<Snapshot> {
        serde_json::from_str(json)
    }

    fn user_sections(&self) -> impl Iterator<Item = &User> {
        self.admins
            .iter()
            .chain(&self.managers)
            .chain(&self.affiliates)
            .chain(&self.logistics_users)
            .chain(&self.customer_care_users)
    }

    /// All accounts merged into one directory, role sections in load order.
    pub fn users(&self) -> Vec<User> {
        self.user_sections().cloned().collect()
    }

    pub fn find_user(&self, id: &UserId) -> Option<&User> {
        self.user_sections().find(|u| &u.id == id)
    }
}
