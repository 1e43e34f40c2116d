//! Reviewer decisions.
//!
//! The only path that sets `status` away from `pending` or writes
//! `commentAdmin`. Employees never reach it.

use crate::entities::{BillModel, BillStatus};
use crate::errors::{Error, Result};
use crate::store::BillUpdate;

/// Outcome chosen by a reviewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Bill is reimbursed
    Accept,
    /// Bill is turned down
    Refuse,
}

impl Decision {
    /// Status the bill ends up in
    #[must_use]
    pub const fn status(self) -> BillStatus {
        match self {
            Self::Accept => BillStatus::Accepted,
            Self::Refuse => BillStatus::Refused,
        }
    }
}

/// Builds the update recording `decision` on `bill`.
///
/// # Errors
/// `InvalidStatusTransition` when the bill is no longer pending.
pub fn review(bill: &BillModel, decision: Decision, comment: Option<&str>) -> Result<BillUpdate> {
    let next = decision.status();
    if !bill.status.can_transition_to(next) {
        return Err(Error::InvalidStatusTransition {
            from: bill.status,
            to: next,
        });
    }

    Ok(BillUpdate {
        status: Some(next),
        comment_admin: comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        ..BillUpdate::new(bill.id)
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::make_bill;

    #[test]
    fn test_accepting_a_pending_bill() {
        let bill = make_bill(3, "Hôtel", "2021-03-03");
        let update = review(&bill, Decision::Accept, Some("  ok  ")).unwrap();

        assert_eq!(update.id, 3);
        assert_eq!(update.status, Some(BillStatus::Accepted));
        assert_eq!(update.comment_admin.as_deref(), Some("ok"));
        assert!(update.file_url.is_none());
    }

    #[test]
    fn test_blank_comment_is_dropped() {
        let bill = make_bill(3, "Hôtel", "2021-03-03");
        let update = review(&bill, Decision::Refuse, Some("   ")).unwrap();
        assert_eq!(update.status, Some(BillStatus::Refused));
        assert!(update.comment_admin.is_none());
    }

    #[test]
    fn test_reviewed_bill_cannot_be_reviewed_again() {
        let mut bill = make_bill(3, "Hôtel", "2021-03-03");
        bill.status = BillStatus::Refused;

        let result = review(&bill, Decision::Accept, None);
        assert!(matches!(
            result,
            Err(Error::InvalidStatusTransition {
                from: BillStatus::Refused,
                to: BillStatus::Accepted,
            })
        ));
    }
}
