//! Bill store - the persistence capability consumed by the application.
//!
//! [`BillStore`] is the seam between the core and wherever bills live. The
//! crate ships a SeaORM/SQLite implementation and an in-memory one; both
//! enforce the same status rules on update.

/// In-memory store with scriptable failures
pub mod memory;
/// `SQLite` store built on `SeaORM`
pub mod sqlite;

pub use memory::InMemoryBillStore;
pub use sqlite::SqliteBillStore;

use crate::entities::{BillModel, BillStatus};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload of a bill creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    /// Submitting employee
    pub email: String,
    /// Expense category
    #[serde(rename = "type")]
    pub bill_type: String,
    /// Name of the expense
    pub name: String,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    /// Amount including taxes
    pub amount: f64,
    /// VAT amount, if given
    pub vat: Option<f64>,
    /// VAT percentage
    pub pct: i32,
    /// Comment for the reviewer
    pub commentary: Option<String>,
    /// URL returned by the receipt upload
    pub file_url: String,
    /// Name of the receipt file
    pub file_name: String,
    /// Always `pending` for a new bill
    pub status: BillStatus,
}

/// Partial update of a stored bill. `None` leaves a field unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillUpdate {
    /// Bill to change
    pub id: i64,
    /// New review status
    pub status: Option<BillStatus>,
    /// Reviewer note
    pub comment_admin: Option<String>,
    /// Replacement receipt URL
    pub file_url: Option<String>,
    /// Replacement receipt name
    pub file_name: Option<String>,
}

impl BillUpdate {
    /// Update of bill `id` that changes nothing yet
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            status: None,
            comment_admin: None,
            file_url: None,
            file_name: None,
        }
    }

    /// Applies the update to `bill`, refusing illegal status moves.
    pub fn apply_to(&self, bill: &mut BillModel) -> Result<()> {
        if let Some(next) = self.status {
            if !bill.status.can_transition_to(next) {
                return Err(Error::InvalidStatusTransition {
                    from: bill.status,
                    to: next,
                });
            }
            bill.status = next;
        }
        if let Some(comment) = &self.comment_admin {
            bill.comment_admin = Some(comment.clone());
        }
        if let Some(url) = &self.file_url {
            bill.file_url = Some(url.clone());
        }
        if let Some(name) = &self.file_name {
            bill.file_name = Some(name.clone());
        }
        Ok(())
    }
}

/// Receipt file sent for storage.
#[derive(Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    /// Uploading employee
    pub email: String,
    /// Name of the file as selected
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub content_type: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ReceiptUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptUpload")
            .field("email", &self.email)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Remote bill persistence.
///
/// Failures are returned, never retried. Their `Display` is what the user
/// sees in the bills list.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Every stored bill, in no particular order.
    ///
    /// # Errors
    /// Store failure, shown verbatim to the employee.
    async fn list(&self) -> Result<Vec<BillModel>>;

    /// Persists `bill` and returns it with its assigned id.
    ///
    /// # Errors
    /// Store failure, shown verbatim to the employee.
    async fn create(&self, bill: NewBill) -> Result<BillModel>;

    /// Applies `update` and returns the stored bill.
    ///
    /// # Errors
    /// `BillNotFound`, `InvalidStatusTransition` or a store failure.
    async fn update(&self, update: BillUpdate) -> Result<BillModel>;

    /// Stores a receipt and returns its `fileUrl`.
    async fn upload(&self, receipt: ReceiptUpload) -> Result<String>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::make_bill;

    #[test]
    fn test_apply_update_fields() {
        let mut bill = make_bill(1, "Taxi", "2021-05-05");
        let update = BillUpdate {
            status: Some(BillStatus::Accepted),
            comment_admin: Some("RAS".to_string()),
            file_url: Some("/receipts/9".to_string()),
            ..BillUpdate::new(1)
        };

        update.apply_to(&mut bill).unwrap();

        assert_eq!(bill.status, BillStatus::Accepted);
        assert_eq!(bill.comment_admin.as_deref(), Some("RAS"));
        assert_eq!(bill.file_url.as_deref(), Some("/receipts/9"));
        assert_eq!(bill.name, "Taxi");
    }

    #[test]
    fn test_apply_update_refuses_leaving_final_status() {
        let mut bill = make_bill(1, "Taxi", "2021-05-05");
        bill.status = BillStatus::Accepted;
        let update = BillUpdate {
            status: Some(BillStatus::Pending),
            ..BillUpdate::new(1)
        };

        assert!(update.apply_to(&mut bill).is_err());
        assert_eq!(bill.status, BillStatus::Accepted);
    }

    #[test]
    fn test_receipt_debug_hides_bytes() {
        let upload = ReceiptUpload {
            email: "a@a".to_string(),
            file_name: "image.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0; 2048],
        };
        let rendered = format!("{upload:?}");
        assert!(rendered.contains("bytes: 2048"));
    }

    #[test]
    fn test_new_bill_json_field_names() {
        let bill = NewBill {
            email: "a@a".to_string(),
            bill_type: "Transports".to_string(),
            name: "Taxi".to_string(),
            date: "2021-05-05".to_string(),
            amount: 30.0,
            vat: None,
            pct: 20,
            commentary: None,
            file_url: "/receipts/1".to_string(),
            file_name: "taxi.png".to_string(),
            status: BillStatus::Pending,
        };
        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["type"], "Transports");
        assert_eq!(json["fileUrl"], "/receipts/1");
        assert_eq!(json["status"], "pending");
    }
}
