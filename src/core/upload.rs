//! Receipt file acceptance.
//!
//! Only the trailing extension is checked; the file content is never
//! inspected. Accepting a file records its name on the draft and asks the
//! shell to upload it; rejecting it clears the file input and alerts.

use crate::core::draft::BillDraft;
use crate::core::submission::Effect;
use crate::store::ReceiptUpload;
use tracing::debug;

/// Receipt extensions accepted by the form, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Alert raised when a file with another extension is selected.
pub const REJECTED_FILE_ALERT: &str =
    "Format de justificatif non supporté : choisissez un fichier jpg, jpeg ou png.";

/// A file picked in the receipt input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name including its extension
    pub name: String,
    /// MIME type reported by the input, e.g. `image/png`
    pub content_type: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Builds a selection from the input's file.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Whether `name` ends in one of [`ACCEPTED_EXTENSIONS`].
#[must_use]
pub fn is_accepted_file_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, extension)| {
        !stem.is_empty()
            && ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    })
}

/// Applies a file selection to `draft`.
///
/// On rejection the draft is left exactly as it was.
pub fn accept_file(draft: &mut BillDraft, file: SelectedFile, email: &str) -> Vec<Effect> {
    if !is_accepted_file_name(&file.name) {
        debug!(file_name = %file.name, "receipt rejected");
        return vec![
            Effect::ClearFileInput,
            Effect::Alert(REJECTED_FILE_ALERT.to_string()),
        ];
    }

    debug!(file_name = %file.name, "receipt accepted, uploading");
    draft.file_name = Some(file.name.clone());
    draft.file_url = None;

    vec![Effect::UploadReceipt(ReceiptUpload {
        email: email.to_string(),
        file_name: file.name,
        content_type: file.content_type,
        bytes: file.bytes,
    })]
}
