//! Role-targeted notifications.
//!
//! A notification is broadcast to roles, not to users: visibility is decided
//! at read time from `targetRoles`, and per-user read state is the `readBy`
//! list on the record itself. Marking read is idempotent, so replaying a
//! mark against an already-read notification changes nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use affilia_auth::{Role, User};
use affilia_core::{NotificationId, UserId};

/// A broadcast message addressed to one or more roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub target_roles: Vec<Role>,
    /// Machine-readable event tag ("new-product", "product-deactivated").
    #[serde(default)]
    pub event_type: Option<String>,
    /// In-app destination ("product-detail/<id>").
    #[serde(default)]
    pub link_to: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Users who have opened the notification. Never contains duplicates.
    #[serde(default)]
    pub read_by: Vec<UserId>,
}

impl Notification {
    /// Whether the user's role is among the addressees.
    pub fn visible_to(&self, user: &User) -> bool {
        self.target_roles.contains(&user.role)
    }

    pub fn is_read_by(&self, user: &UserId) -> bool {
        self.read_by.contains(user)
    }
}

/// Build a new notification record. Creation is the only place the id and
/// timestamp are assigned; the read list starts empty.
pub fn create_notification(
    title: impl Into<String>,
    message: impl Into<String>,
    target_roles: Vec<Role>,
    event_type: Option<String>,
    link_to: Option<String>,
    at: DateTime<Utc>,
) -> Notification {
    Notification {
        id: NotificationId::new(),
        title: title.into(),
        message: message.into(),
        target_roles,
        event_type,
        link_to,
        created_at: at,
        read_by: Vec::new(),
    }
}

/// Add the user to the notification's read list. Returns whether the record
/// changed.
pub fn mark_read(notification: &mut Notification, user: &UserId) -> bool {
    if notification.is_read_by(user) {
        return false;
    }
    notification.read_by.push(user.clone());
    true
}

/// Mark every notification the user can see as read. Returns how many
/// records changed.
pub fn mark_all_read(notifications: &mut [Notification], user: &User) -> usize {
    let mut changed = 0;
    for notification in notifications.iter_mut() {
        if notification.visible_to(user) && mark_read(notification, &user.id) {
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::debug!(user = %user.id, changed, "notifications marked read");
    }
    changed
}

/// Notifications addressed to the user's role, newest unchanged order.
pub fn visible_notifications<'a>(
    notifications: &'a [Notification],
    user: &User,
) -> Vec<&'a Notification> {
    notifications.iter().filter(|n| n.visible_to(user)).collect()
}

/// Visible notifications the user has not opened yet.
pub fn unread_count(notifications: &[Notification], user: &User) -> usize {
    notifications
        .iter()
        .filter(|n| n.visible_to(user) && !n.is_read_by(&user.id))
        .count()
}
