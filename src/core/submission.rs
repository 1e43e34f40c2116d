//! New-bill submission state machine.
//!
//! The controller never performs I/O. Each event handler mutates the draft
//! and returns the [`Effect`]s the shell must carry out, in order.
//!
//! ```text
//! Editing --submit(valid)--> Submitting --created--> Completed
//!                                       --rejected--> Failed
//! ```

use crate::config::FormConfig;
use crate::core::draft::{BillDraft, FormError, FormField, build_new_bill};
use crate::core::route::Route;
use crate::core::session::Session;
use crate::core::upload::{self, SelectedFile};
use crate::store::{NewBill, ReceiptUpload};
use tracing::{debug, info, warn};

/// Side effect requested by a controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Blocking user-facing alert
    Alert(String),
    /// Empty the receipt file input
    ClearFileInput,
    /// Send the accepted receipt to the store
    UploadReceipt(ReceiptUpload),
    /// Persist the bill
    CreateBill(NewBill),
    /// Show another route
    Navigate(Route),
    /// Show a store failure in the bills list error state
    ShowListError(String),
}

/// Lifecycle of one new-bill form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    /// Fields may change; the initial state
    Editing,
    /// Create dispatched, result outstanding
    Submitting,
    /// Bill created
    Completed,
    /// Store refused the bill; the draft was discarded
    Failed,
}

/// Owns the draft of the new-bill form.
#[derive(Debug, Clone)]
pub struct NewBillController {
    draft: BillDraft,
    errors: Vec<FormError>,
    state: SubmissionState,
    email: String,
    policy: FormConfig,
}

impl NewBillController {
    /// Empty form owned by the session's employee.
    ///
    /// # Arguments
    /// * `session` - Signed-in employee; its email goes on the bill
    /// * `policy` - Default percentage and optional name rule
    #[must_use]
    pub fn new(session: &Session, policy: FormConfig) -> Self {
        Self {
            draft: BillDraft::default(),
            errors: Vec::new(),
            state: SubmissionState::Editing,
            email: session.email.clone().unwrap_or_default(),
            policy,
        }
    }

    /// Draft as currently filled in
    #[must_use]
    pub const fn draft(&self) -> &BillDraft {
        &self.draft
    }

    /// Problems found by the last refused submit
    #[must_use]
    pub fn errors(&self) -> &[FormError] {
        &self.errors
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Updates `field` and clears the errors shown under it.
    ///
    /// Ignored once the form has been submitted.
    pub fn change_field(&mut self, field: FormField, value: impl Into<String>) {
        if self.state != SubmissionState::Editing {
            return;
        }
        self.draft.set(field, value);
        self.errors.retain(|error| error.field() != Some(field));
    }

    /// Handles a receipt selection.
    ///
    /// # Returns
    /// `UploadReceipt` for an accepted file, `ClearFileInput` then `Alert` for a
    /// rejected one, nothing once the form has been submitted.
    pub fn select_file(&mut self, file: SelectedFile) -> Vec<Effect> {
        if self.state != SubmissionState::Editing {
            return Vec::new();
        }
        let effects = upload::accept_file(&mut self.draft, file, &self.email);
        if self.draft.file_name.is_some() {
            self.errors.retain(|error| *error != FormError::MissingAttachment);
        }
        effects
    }

    /// Records the URL of an uploaded receipt.
    ///
    /// Ignored when the employee has picked another file in the meantime.
    pub fn upload_resolved(&mut self, file_name: &str, file_url: String) {
        if self.draft.file_name.as_deref() == Some(file_name) {
            debug!(file_name, "receipt upload resolved");
            self.draft.file_url = Some(file_url);
        }
    }

    /// Drops a receipt whose upload failed.
    ///
    /// # Returns
    /// `ClearFileInput` then `Alert(message)`, or nothing when another file has
    /// been picked since.
    pub fn upload_failed(&mut self, file_name: &str, message: &str) -> Vec<Effect> {
        if self.draft.file_name.as_deref() != Some(file_name) {
            return Vec::new();
        }
        warn!(file_name, "receipt upload failed: {message}");
        self.draft.file_name = None;
        self.draft.file_url = None;
        vec![Effect::ClearFileInput, Effect::Alert(message.to_string())]
    }

    /// Handles the submit action.
    ///
    /// A valid draft yields `CreateBill` then `Navigate(Bills)`. An invalid one
    /// stays in `Editing` with [`errors`](Self::errors) filled and no effect.
    /// Submitting again while a create is outstanding does nothing.
    pub fn submit(&mut self) -> Vec<Effect> {
        if self.state != SubmissionState::Editing {
            debug!(state = ?self.state, "submit ignored");
            return Vec::new();
        }

        match build_new_bill(&self.draft, &self.email, &self.policy) {
            Ok(bill) => {
                info!(email = %bill.email, date = %bill.date, "submitting new bill");
                self.errors.clear();
                self.state = SubmissionState::Submitting;
                vec![Effect::CreateBill(bill), Effect::Navigate(Route::Bills)]
            }
            Err(errors) => {
                debug!(?errors, "submit refused");
                self.errors = errors;
                Vec::new()
            }
        }
    }

    /// Marks the outstanding create as done.
    pub fn create_succeeded(&mut self) {
        if self.state == SubmissionState::Submitting {
            self.state = SubmissionState::Completed;
        }
    }

    /// The draft is discarded and the failure goes to the bills list.
    pub fn create_failed(&mut self, message: &str) -> Vec<Effect> {
        if self.state != SubmissionState::Submitting {
            return Vec::new();
        }
        warn!("bill creation failed: {message}");
        self.state = SubmissionState::Failed;
        self.draft = BillDraft::default();
        vec![Effect::ShowListError(message.to_string())]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn controller() -> NewBillController {
        NewBillController::new(&Session::employee("a@a"), FormConfig::default())
    }

    fn fill_fields(controller: &mut NewBillController) {
        controller.change_field(FormField::ExpenseType, "Transports");
        controller.change_field(FormField::Name, "Vol Paris Londres");
        controller.change_field(FormField::Date, "2021-11-22");
        controller.change_field(FormField::Amount, "348");
        controller.change_field(FormField::Vat, "70");
        controller.change_field(FormField::Commentary, "Séminaire");
    }

    fn attach(controller: &mut NewBillController) {
        controller.select_file(SelectedFile::new("image.jpg", "image/jpeg", b"jpg".to_vec()));
        controller.upload_resolved("image.jpg", "/receipts/1".to_string());
    }

    #[test]
    fn test_submit_without_file_is_refused() {
        let mut controller = controller();
        fill_fields(&mut controller);

        let effects = controller.submit();

        assert!(effects.is_empty());
        assert_eq!(controller.state(), SubmissionState::Editing);
        assert_eq!(controller.errors(), &[FormError::MissingAttachment]);
    }

    #[test]
    fn test_valid_submit_creates_then_navigates() {
        let mut controller = controller();
        fill_fields(&mut controller);
        attach(&mut controller);

        let effects = controller.submit();

        assert_eq!(effects.len(), 2);
        match &effects[0] {
            Effect::CreateBill(bill) => {
                assert_eq!(bill.email, "a@a");
                assert_eq!(bill.pct, 20);
                assert_eq!(bill.file_url, "/receipts/1");
                assert_eq!(bill.file_name, "image.jpg");
            }
            other => panic!("expected create, got {other:?}"),
        }
        assert_eq!(effects[1], Effect::Navigate(Route::Bills));
        assert_eq!(controller.state(), SubmissionState::Submitting);
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let mut controller = controller();
        fill_fields(&mut controller);
        attach(&mut controller);

        assert_eq!(controller.submit().len(), 2);
        assert!(controller.submit().is_empty());

        controller.create_succeeded();
        assert_eq!(controller.state(), SubmissionState::Completed);
        assert!(controller.submit().is_empty());
    }

    #[test]
    fn test_fields_frozen_after_submit() {
        let mut controller = controller();
        fill_fields(&mut controller);
        attach(&mut controller);
        controller.submit();

        controller.change_field(FormField::Name, "changed");
        assert_eq!(controller.draft().name, "Vol Paris Londres");
        assert!(
            controller
                .select_file(SelectedFile::new("other.png", "image/png", Vec::new()))
                .is_empty()
        );
    }

    #[test]
    fn test_create_failure_discards_draft_and_reports() {
        let mut controller = controller();
        fill_fields(&mut controller);
        attach(&mut controller);
        controller.submit();

        let effects = controller.create_failed("Erreur 500");

        assert_eq!(effects, vec![Effect::ShowListError("Erreur 500".to_string())]);
        assert_eq!(controller.state(), SubmissionState::Failed);
        assert_eq!(controller.draft(), &BillDraft::default());
    }

    #[test]
    fn test_create_result_ignored_when_not_submitting() {
        let mut controller = controller();
        assert!(controller.create_failed("Erreur 404").is_empty());
        controller.create_succeeded();
        assert_eq!(controller.state(), SubmissionState::Editing);
    }

    #[test]
    fn test_stale_upload_result_is_ignored() {
        let mut controller = controller();
        controller.select_file(SelectedFile::new("first.png", "image/png", Vec::new()));
        controller.select_file(SelectedFile::new("second.png", "image/png", Vec::new()));

        controller.upload_resolved("first.png", "/receipts/1".to_string());
        assert!(controller.draft().file_url.is_none());

        controller.upload_resolved("second.png", "/receipts/2".to_string());
        assert_eq!(controller.draft().file_url.as_deref(), Some("/receipts/2"));
    }

    #[test]
    fn test_upload_failure_clears_attachment() {
        let mut controller = controller();
        controller.select_file(SelectedFile::new("image.png", "image/png", Vec::new()));

        let effects = controller.upload_failed("image.png", "Erreur 500");

        assert!(controller.draft().file_name.is_none());
        assert_eq!(
            effects,
            vec![
                Effect::ClearFileInput,
                Effect::Alert("Erreur 500".to_string())
            ]
        );
    }

    #[test]
    fn test_editing_a_field_clears_its_error() {
        let mut controller = controller();
        controller.submit();
        assert!(controller.errors().contains(&FormError::InvalidDate));

        controller.change_field(FormField::Date, "2021-11-22");
        assert!(!controller.errors().contains(&FormError::InvalidDate));
        assert!(controller.errors().contains(&FormError::MissingAttachment));

        controller.select_file(SelectedFile::new("image.png", "image/png", Vec::new()));
        assert!(!controller.errors().contains(&FormError::MissingAttachment));
    }
}
