//! User records.
//!
//! Users are managed by an external identity collaborator; the console only
//! consumes them as snapshot records. Balances are never stored on the user,
//! they are derived by the ledger on every snapshot refresh.

use serde::{Deserialize, Serialize};

use affilia_core::UserId;

use crate::Role;

/// A console user of any role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}
