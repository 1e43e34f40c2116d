//! New bill form.

use super::escape;
use crate::core::draft::{BillDraft, FormError, FormField};
use crate::core::upload::ACCEPTED_EXTENSIONS;

/// Title of the form, also its marker text
pub const NEW_BILL_TITLE: &str = "Envoyer une note de frais";

/// Options of the expense type select
pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

fn field_errors(errors: &[FormError], field: Option<FormField>) -> String {
    let test_id = field.map_or("file", FormField::test_id);
    errors
        .iter()
        .filter(|error| error.field() == field)
        .map(|error| {
            format!(
                "<p class=\"error-message\" data-testid=\"error-{test_id}\">{}</p>",
                escape(&error.message())
            )
        })
        .collect()
}

fn input(
    draft: &BillDraft,
    errors: &[FormError],
    field: FormField,
    label: &str,
    kind: &str,
    placeholder: &str,
) -> String {
    format!(
        "<label for=\"{id}\" class=\"bold-label\">{label}</label>\
         <input type=\"{kind}\" class=\"form-control blue-border\" data-testid=\"{id}\" placeholder=\"{placeholder}\" value=\"{value}\" />{errors}",
        id = field.test_id(),
        value = escape(draft.get(field)),
        errors = field_errors(errors, Some(field)),
    )
}

fn type_select(draft: &BillDraft, errors: &[FormError]) -> String {
    let options: String = EXPENSE_TYPES
        .iter()
        .map(|option| {
            let selected = if draft.expense_type == *option {
                " selected"
            } else {
                ""
            };
            format!("<option{selected}>{}</option>", escape(option))
        })
        .collect();
    format!(
        "<label for=\"expense-type\" class=\"bold-label\">Type de dépense</label>\
         <select required class=\"form-control blue-border\" data-testid=\"expense-type\">{options}</select>{}",
        field_errors(errors, Some(FormField::ExpenseType))
    )
}

fn file_input(draft: &BillDraft, errors: &[FormError]) -> String {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let current = draft
        .file_name
        .as_deref()
        .map(|name| format!("<span data-testid=\"file-name\">{}</span>", escape(name)))
        .unwrap_or_default();
    format!(
        "<label for=\"file\" class=\"bold-label\">Justificatif</label>\
         <input required type=\"file\" accept=\"{accept}\" class=\"form-control blue-border\" data-testid=\"file\" />{current}{}",
        field_errors(errors, None)
    )
}

/// Renders the form filled with `draft`, with `errors` under their fields.
#[must_use]
pub fn render(draft: &BillDraft, errors: &[FormError]) -> String {
    format!(
        "<div class=\"content-header\"><div class=\"content-title\">{NEW_BILL_TITLE}</div></div>\
         <div class=\"form-newbill-container content-inner\">\
         <form data-testid=\"form-new-bill\">\
         <div class=\"row\"><div class=\"col-md-6\">\
         <div class=\"col-half\">{expense_type}</div>\
         <div class=\"col-half\">{name}</div>\
         <div class=\"col-half\">{date}</div>\
         <div class=\"col-half\">{amount}</div>\
         <div class=\"col-half-row\">\
         <div class=\"flex-col\">{vat}</div>\
         <div class=\"flex-col\">{pct}</div>\
         </div></div>\
         <div class=\"col-md-6\">\
         <div class=\"col-half\"><label for=\"commentary\" class=\"form-check-label bold-label\">Commentaire</label>\
         <textarea class=\"form-control blue-border\" data-testid=\"commentary\" rows=\"3\">{commentary}</textarea></div>\
         <div class=\"col-half\">{file}</div>\
         </div></div>\
         <div class=\"row\"><div class=\"col-md-6\"><div class=\"col-half\">\
         <button type=\"submit\" id=\"btn-send-bill\" class=\"btn btn-primary\">Envoyer</button>\
         </div></div></div>\
         </form></div>",
        expense_type = type_select(draft, errors),
        name = input(draft, errors, FormField::Name, "Nom de la dépense", "text", "Vol Paris Londres"),
        date = input(draft, errors, FormField::Date, "Date", "date", ""),
        amount = input(draft, errors, FormField::Amount, "Montant TTC", "number", "348"),
        vat = input(draft, errors, FormField::Vat, "TVA", "number", "70"),
        pct = input(draft, errors, FormField::Pct, "%", "number", "20"),
        commentary = escape(&draft.commentary),
        file = file_input(draft, errors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form() {
        let html = render(&BillDraft::default(), &[]);
        assert!(html.contains(NEW_BILL_TITLE));
        assert!(html.contains("data-testid=\"form-new-bill\""));
        assert!(html.contains("Justificatif"));
        assert!(html.contains("accept=\".jpg,.jpeg,.png\""));
        for field in FormField::ALL {
            assert!(html.contains(&format!("data-testid=\"{}\"", field.test_id())));
        }
        assert!(!html.contains("error-message"));
    }

    #[test]
    fn test_missing_attachment_message() {
        let html = render(&BillDraft::default(), &[FormError::MissingAttachment]);
        assert!(html.contains("data-testid=\"error-file\""));
        assert!(html.contains(&FormError::MissingAttachment.message()));
    }

    #[test]
    fn test_field_error_under_its_field() {
        let html = render(&BillDraft::default(), &[FormError::NameTooShort { min: 5 }]);
        assert!(html.contains("data-testid=\"error-expense-name\""));
        assert!(html.contains("Vous devez entrer au moins 5 caractères."));
    }

    #[test]
    fn test_draft_values_are_kept() {
        let draft = BillDraft {
            expense_type: "Hôtel et logement".to_string(),
            name: "Nuit \"Ibis\"".to_string(),
            commentary: "a < b".to_string(),
            file_name: Some("image.png".to_string()),
            ..BillDraft::default()
        };
        let html = render(&draft, &[]);
        assert!(html.contains("<option selected>Hôtel et logement</option>"));
        assert!(html.contains("value=\"Nuit &quot;Ibis&quot;\""));
        assert!(html.contains(">a &lt; b</textarea>"));
        assert!(html.contains("<span data-testid=\"file-name\">image.png</span>"));
    }
}
