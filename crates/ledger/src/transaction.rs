//! Money-movement records.
//!
//! A transaction is append-only once settled: payouts are born `Pending` and
//! resolve exactly once to `Completed` or `Failed`; transfers and adjustments
//! are born `Completed`. Only `Completed` transactions ever influence a
//! balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use affilia_core::{Money, TransactionId, UserId};

/// Settlement state of a transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub const fn is_settled(self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl core::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Failed => "Failed",
        })
    }
}

/// How a payout is routed to the recipient.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    PayPal,
    #[serde(rename = "Bonifico Bancario")]
    BonificoBancario,
    Worldfili,
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::BonificoBancario => "Bonifico Bancario",
            PaymentMethod::Worldfili => "Worldfili",
        })
    }
}

/// The kind-specific fields of a transaction, tagged on the wire as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionKind {
    /// Withdrawal of earned commission out of the platform.
    #[serde(rename_all = "camelCase")]
    Payout {
        user_id: UserId,
        payment_method: PaymentMethod,
        /// Free-form routing details (IBAN, PayPal address).
        payment_details: String,
    },
    /// Internal balance movement between two users.
    #[serde(rename_all = "camelCase")]
    Transfer {
        from_user_id: UserId,
        from_user_name: String,
        to_user_id: UserId,
        to_user_name: String,
        #[serde(default)]
        notes: Option<String>,
    },
    /// Admin-issued balance credit outside the commission flow.
    #[serde(rename_all = "camelCase")]
    Adjustment { to_user_id: UserId },
}

/// One money movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Money,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_payout(&self) -> bool {
        matches!(self.kind, TransactionKind::Payout { .. })
    }

    /// Pending payout requested by the given user.
    pub fn is_pending_payout_of(&self, user: &UserId) -> bool {
        self.status == TransactionStatus::Pending
            && matches!(&self.kind, TransactionKind::Payout { user_id, .. } if user_id == user)
    }

    /// Signed effect of this transaction on the given user's balance.
    /// Zero unless the transaction is `Completed` and touches the user.
    pub fn effect_on(&self, user: &UserId) -> Money {
        if self.status != TransactionStatus::Completed {
            return Money::ZERO;
        }
        match &self.kind {
            TransactionKind::Payout { user_id, .. } if user_id == user => -self.amount,
            TransactionKind::Transfer {
                from_user_id,
                to_user_id,
                ..
            } => {
                let mut effect = Money::ZERO;
                if to_user_id == user {
                    effect += self.amount;
                }
                if from_user_id == user {
                    effect -= self.amount;
                }
                effect
            }
            TransactionKind::Adjustment { to_user_id } if to_user_id == user => self.amount,
            _ => Money::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn payout_wire_form_is_flat_and_tagged() {
        let tx = Transaction {
            id: TransactionId::from("T-1"),
            amount: Money::from_cents(5000),
            status: TransactionStatus::Pending,
            created_at: test_time(),
            kind: TransactionKind::Payout {
                user_id: UserId::from("a1"),
                payment_method: PaymentMethod::BonificoBancario,
                payment_details: "IT60X0542811101000000123456".to_string(),
            },
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "Payout");
        assert_eq!(json["paymentMethod"], "Bonifico Bancario");
        assert_eq!(json["amount"], 50.0);

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn pending_transactions_have_no_balance_effect() {
        let tx = Transaction {
            id: TransactionId::from("T-1"),
            amount: Money::from_cents(5000),
            status: TransactionStatus::Pending,
            created_at: test_time(),
            kind: TransactionKind::Payout {
                user_id: UserId::from("a1"),
                payment_method: PaymentMethod::PayPal,
                payment_details: "a1@example.com".to_string(),
            },
        };

        assert_eq!(tx.effect_on(&UserId::from("a1")), Money::ZERO);
        assert!(tx.is_pending_payout_of(&UserId::from("a1")));
    }

    #[test]
    fn transfer_effect_is_signed_per_side() {
        let tx = Transaction {
            id: TransactionId::from("T-2"),
            amount: Money::from_cents(2000),
            status: TransactionStatus::Completed,
            created_at: test_time(),
            kind: TransactionKind::Transfer {
                from_user_id: UserId::from("m1"),
                from_user_name: "Marco".to_string(),
                to_user_id: UserId::from("a1"),
                to_user_name: "Anna".to_string(),
                notes: None,
            },
        };

        assert_eq!(tx.effect_on(&UserId::from("m1")), Money::from_cents(-2000));
        assert_eq!(tx.effect_on(&UserId::from("a1")), Money::from_cents(2000));
        assert_eq!(tx.effect_on(&UserId::from("x9")), Money::ZERO);
    }

    #[test]
    fn self_transfer_nets_to_zero() {
        let tx = Transaction {
            id: TransactionId::from("T-3"),
            amount: Money::from_cents(1000),
            status: TransactionStatus::Completed,
            created_at: test_time(),
            kind: TransactionKind::Transfer {
                from_user_id: UserId::from("a1"),
                from_user_name: "Anna".to_string(),
                to_user_id: UserId::from("a1"),
                to_user_name: "Anna".to_string(),
                notes: None,
            },
        };

        assert_eq!(tx.effect_on(&UserId::from("a1")), Money::ZERO);
    }
}
