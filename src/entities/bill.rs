//! Bill entity - One submitted expense record.
//!
//! Field names serialize in camelCase (`fileUrl`, `commentAdmin`) and the
//! category is exposed as `type`, matching what the bill store speaks.
//! The date stays a raw ISO string: ordering compares it lexicographically,
//! and a malformed date must still be listed rather than dropped.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review status of a bill.
///
/// Only `Pending` can move, and only to `Accepted` or `Refused`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Awaiting review
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved by a reviewer
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Turned down by a reviewer
    #[sea_orm(string_value = "refused")]
    Refused,
}

impl BillStatus {
    /// Lowercase name, as stored and serialized
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
        }
    }

    /// Whether a reviewer may move a bill from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted | Self::Refused)
        )
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bill database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Submitting employee, taken from the session
    pub email: String,
    /// Expense category (e.g. "Hôtel et logement", "Transports")
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub bill_type: String,
    /// Name of the expense
    pub name: String,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    /// Amount including taxes
    pub amount: f64,
    /// VAT amount, when given
    pub vat: Option<f64>,
    /// VAT percentage
    pub pct: i32,
    /// Employee comment
    pub commentary: Option<String>,
    /// URL of the receipt image
    pub file_url: Option<String>,
    /// Name of the receipt file
    pub file_name: Option<String>,
    /// Review status
    pub status: BillStatus,
    /// Reviewer note, written only by the review workflow
    pub comment_admin: Option<String>,
}

/// Bills have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_only_pending_bills_can_change_status() {
        assert!(BillStatus::Pending.can_transition_to(BillStatus::Accepted));
        assert!(BillStatus::Pending.can_transition_to(BillStatus::Refused));
        assert!(!BillStatus::Pending.can_transition_to(BillStatus::Pending));
        assert!(!BillStatus::Accepted.can_transition_to(BillStatus::Refused));
        assert!(!BillStatus::Refused.can_transition_to(BillStatus::Accepted));
        assert!(!BillStatus::Accepted.can_transition_to(BillStatus::Pending));
    }

    #[test]
    fn test_bill_serializes_with_store_field_names() {
        let bill = Model {
            id: 7,
            email: "a@a".to_string(),
            bill_type: "Transports".to_string(),
            name: "Train Paris".to_string(),
            date: "2021-11-22".to_string(),
            amount: 120.0,
            vat: Some(20.0),
            pct: 20,
            commentary: None,
            file_url: Some("https://receipts.test/1".to_string()),
            file_name: Some("ticket.png".to_string()),
            status: BillStatus::Pending,
            comment_admin: None,
        };

        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["type"], "Transports");
        assert_eq!(json["fileName"], "ticket.png");
        assert_eq!(json["status"], "pending");
        assert!(json["commentAdmin"].is_null());
    }
}
