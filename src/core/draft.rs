//! The new-bill draft and the create payload built from it.
//!
//! The draft holds field values exactly as typed. [`build_new_bill`] is the
//! only place they get parsed, so a half-filled form never fails early.

use crate::config::FormConfig;
use crate::entities::BillStatus;
use crate::store::NewBill;
use chrono::NaiveDate;

/// Editable fields of the new-bill form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Expense category select
    ExpenseType,
    /// Expense name
    Name,
    /// Date picker
    Date,
    /// Amount including taxes
    Amount,
    /// VAT amount
    Vat,
    /// VAT percentage
    Pct,
    /// Comment textarea
    Commentary,
}

impl FormField {
    /// Fields in form order
    pub const ALL: [Self; 7] = [
        Self::ExpenseType,
        Self::Name,
        Self::Date,
        Self::Amount,
        Self::Vat,
        Self::Pct,
        Self::Commentary,
    ];

    /// `data-testid` of the matching input in the rendered form
    #[must_use]
    pub const fn test_id(self) -> &'static str {
        match self {
            Self::ExpenseType => "expense-type",
            Self::Name => "expense-name",
            Self::Date => "datepicker",
            Self::Amount => "amount",
            Self::Vat => "vat",
            Self::Pct => "pct",
            Self::Commentary => "commentary",
        }
    }
}

/// In-memory bill under edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillDraft {
    /// Expense category picked in the select
    pub expense_type: String,
    /// Free-text name of the expense
    pub name: String,
    /// Date as typed, expected `YYYY-MM-DD`
    pub date: String,
    /// Amount including taxes
    pub amount: String,
    /// VAT amount, may be left blank
    pub vat: String,
    /// VAT percentage, blank means the configured default
    pub pct: String,
    /// Optional comment for the reviewer
    pub commentary: String,
    /// Set as soon as a receipt is accepted
    pub file_name: Option<String>,
    /// Set once the receipt upload resolves
    pub file_url: Option<String>,
}

impl BillDraft {
    /// Replaces the value of `field`.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::ExpenseType => self.expense_type = value,
            FormField::Name => self.name = value,
            FormField::Date => self.date = value,
            FormField::Amount => self.amount = value,
            FormField::Vat => self.vat = value,
            FormField::Pct => self.pct = value,
            FormField::Commentary => self.commentary = value,
        }
    }

    /// Current value of `field`, as typed
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ExpenseType => &self.expense_type,
            FormField::Name => &self.name,
            FormField::Date => &self.date,
            FormField::Amount => &self.amount,
            FormField::Vat => &self.vat,
            FormField::Pct => &self.pct,
            FormField::Commentary => &self.commentary,
        }
    }

    /// Both the receipt name and its uploaded URL are known.
    #[must_use]
    pub const fn has_attachment(&self) -> bool {
        self.file_name.is_some() && self.file_url.is_some()
    }
}

/// Reasons a submit is refused before reaching the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormError {
    /// No accepted receipt ("Justificatif")
    MissingAttachment,
    /// No expense type selected
    MissingType,
    /// Date missing or not `YYYY-MM-DD`
    InvalidDate,
    /// Amount missing, negative or not a number
    InvalidAmount,
    /// VAT given but not a non-negative number
    InvalidVat,
    /// Percentage not an integer in `0..=100`
    InvalidPct,
    /// Name shorter than the configured minimum of `min` characters
    NameTooShort { min: usize },
}

impl FormError {
    /// Field the message is displayed under; `None` for the receipt input.
    #[must_use]
    pub const fn field(&self) -> Option<FormField> {
        match self {
            Self::MissingAttachment => None,
            Self::MissingType => Some(FormField::ExpenseType),
            Self::InvalidDate => Some(FormField::Date),
            Self::InvalidAmount => Some(FormField::Amount),
            Self::InvalidVat => Some(FormField::Vat),
            Self::InvalidPct => Some(FormField::Pct),
            Self::NameTooShort { .. } => Some(FormField::Name),
        }
    }

    /// Text displayed under the field
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingAttachment => {
                "Justificatif manquant : ajoutez une image jpg, jpeg ou png.".to_string()
            }
            Self::MissingType => "Choisissez un type de dépense.".to_string(),
            Self::InvalidDate => "Saisissez une date au format AAAA-MM-JJ.".to_string(),
            Self::InvalidAmount => "Saisissez un montant positif.".to_string(),
            Self::InvalidVat => "La TVA doit être un nombre positif.".to_string(),
            Self::InvalidPct => "Le pourcentage doit être compris entre 0 et 100.".to_string(),
            Self::NameTooShort { min } => format!("Vous devez entrer au moins {min} caractères."),
        }
    }
}

/// Parses a decimal typed with either `.` or `,` as separator.
fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validates `draft` and assembles the create payload.
///
/// All problems are reported together. The payload is always `pending`, owned
/// by `email`, and falls back to the configured percentage when `pct` is blank.
pub fn build_new_bill(
    draft: &BillDraft,
    email: &str,
    policy: &FormConfig,
) -> Result<NewBill, Vec<FormError>> {
    let mut errors = Vec::new();

    let attachment = match (&draft.file_name, &draft.file_url) {
        (Some(name), Some(url)) => Some((name.clone(), url.clone())),
        _ => {
            errors.push(FormError::MissingAttachment);
            None
        }
    };

    let bill_type = non_empty(&draft.expense_type);
    if bill_type.is_none() {
        errors.push(FormError::MissingType);
    }

    let name = draft.name.trim().to_string();
    if let Some(min) = policy.min_name_length {
        if name.chars().count() < min {
            errors.push(FormError::NameTooShort { min });
        }
    }

    let date = NaiveDate::parse_from_str(draft.date.trim(), "%Y-%m-%d").ok();
    if date.is_none() {
        errors.push(FormError::InvalidDate);
    }

    let amount = parse_decimal(&draft.amount);
    if amount.is_none() {
        errors.push(FormError::InvalidAmount);
    }

    let vat = if draft.vat.trim().is_empty() {
        None
    } else {
        let parsed = parse_decimal(&draft.vat);
        if parsed.is_none() {
            errors.push(FormError::InvalidVat);
        }
        parsed
    };

    let pct = if draft.pct.trim().is_empty() {
        Some(policy.default_pct)
    } else {
        draft
            .pct
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|pct| (0..=100).contains(pct))
    };
    if pct.is_none() {
        errors.push(FormError::InvalidPct);
    }

    match (attachment, bill_type, date, amount, pct) {
        (Some((file_name, file_url)), Some(bill_type), Some(date), Some(amount), Some(pct))
            if errors.is_empty() =>
        {
            Ok(NewBill {
                email: email.to_string(),
                bill_type,
                name,
                date: date.format("%Y-%m-%d").to_string(),
                amount,
                vat,
                pct,
                commentary: non_empty(&draft.commentary),
                file_url,
                file_name,
                status: BillStatus::Pending,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn complete_draft() -> BillDraft {
        BillDraft {
            expense_type: "Hôtel et logement".to_string(),
            name: "New Bill".to_string(),
            date: "2006-06-08".to_string(),
            amount: "200".to_string(),
            vat: "60".to_string(),
            pct: String::new(),
            commentary: "Hotel trajet voyage".to_string(),
            file_name: Some("preview-facture-free-201801-pdf-1.jpg".to_string()),
            file_url: Some("https://test.storage.tld/receipts/1".to_string()),
        }
    }

    #[test]
    fn test_complete_draft_builds_pending_bill() {
        let bill = build_new_bill(&complete_draft(), "a@a", &FormConfig::default()).unwrap();

        assert_eq!(bill.email, "a@a");
        assert_eq!(bill.bill_type, "Hôtel et logement");
        assert_eq!(bill.date, "2006-06-08");
        assert_eq!(bill.amount, 200.0);
        assert_eq!(bill.vat, Some(60.0));
        assert_eq!(bill.pct, 20);
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.commentary.as_deref(), Some("Hotel trajet voyage"));
        assert_eq!(bill.file_name, "preview-facture-free-201801-pdf-1.jpg");
    }

    #[test]
    fn test_missing_attachment_is_reported() {
        let draft = BillDraft {
            file_name: None,
            file_url: None,
            ..complete_draft()
        };
        let errors = build_new_bill(&draft, "a@a", &FormConfig::default()).unwrap_err();
        assert_eq!(errors, vec![FormError::MissingAttachment]);
        assert!(errors[0].message().contains("Justificatif"));
    }

    #[test]
    fn test_pending_upload_counts_as_missing_attachment() {
        let draft = BillDraft {
            file_url: None,
            ..complete_draft()
        };
        let errors = build_new_bill(&draft, "a@a", &FormConfig::default()).unwrap_err();
        assert!(errors.contains(&FormError::MissingAttachment));
    }

    #[test]
    fn test_field_errors_are_collected() {
        let draft = BillDraft {
            expense_type: "  ".to_string(),
            date: "08/06/2006".to_string(),
            amount: "-3".to_string(),
            vat: "abc".to_string(),
            pct: "120".to_string(),
            ..complete_draft()
        };
        let errors = build_new_bill(&draft, "a@a", &FormConfig::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FormError::MissingType,
                FormError::InvalidDate,
                FormError::InvalidAmount,
                FormError::InvalidVat,
                FormError::InvalidPct,
            ]
        );
    }

    #[test]
    fn test_explicit_pct_and_comma_decimals() {
        let draft = BillDraft {
            amount: "12,50".to_string(),
            vat: String::new(),
            pct: "10".to_string(),
            ..complete_draft()
        };
        let bill = build_new_bill(&draft, "a@a", &FormConfig::default()).unwrap();
        assert_eq!(bill.amount, 12.5);
        assert_eq!(bill.vat, None);
        assert_eq!(bill.pct, 10);
    }

    #[test]
    fn test_configured_default_pct() {
        let policy = FormConfig {
            default_pct: 5,
            ..FormConfig::default()
        };
        let bill = build_new_bill(&complete_draft(), "a@a", &policy).unwrap();
        assert_eq!(bill.pct, 5);
    }

    #[test]
    fn test_name_length_rule_only_when_configured() {
        let draft = BillDraft {
            name: "abc".to_string(),
            ..complete_draft()
        };
        assert!(build_new_bill(&draft, "a@a", &FormConfig::default()).is_ok());

        let policy = FormConfig {
            min_name_length: Some(5),
            ..FormConfig::default()
        };
        let errors = build_new_bill(&draft, "a@a", &policy).unwrap_err();
        assert_eq!(errors, vec![FormError::NameTooShort { min: 5 }]);
        assert_eq!(
            errors[0].message(),
            "Vous devez entrer au moins 5 caractères."
        );
    }

    #[test]
    fn test_draft_field_access() {
        let mut draft = BillDraft::default();
        for field in FormField::ALL {
            draft.set(field, field.test_id());
        }
        for field in FormField::ALL {
            assert_eq!(draft.get(field), field.test_id());
        }
    }
}
