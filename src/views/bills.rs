//! Bills page: list, loading indicator, error message and receipt modal.

use super::escape;
use crate::core::presenter::{BillRow, BillsPage};

/// Title of the bills list, also its marker text
pub const BILLS_TITLE: &str = "Mes notes de frais";
/// Text of the loading indicator
pub const LOADING_TEXT: &str = "Loading...";

/// Renders the bills page. `receipt` is the URL shown in the open modal.
#[must_use]
pub fn render(page: &BillsPage, receipt: Option<&str>) -> String {
    match page {
        BillsPage::Loading => loading(),
        BillsPage::Error(message) => error(message),
        BillsPage::List(rows) => list(rows, receipt),
    }
}

/// Loading indicator, shown alone
#[must_use]
pub fn loading() -> String {
    format!("<div id=\"loading\" data-testid=\"loading\">{LOADING_TEXT}</div>")
}

/// The message is rendered as given, nothing else is added.
#[must_use]
pub fn error(message: &str) -> String {
    format!(
        "<div class=\"error-page\" data-testid=\"error-message\">{}</div>",
        escape(message)
    )
}

fn row(bill: &BillRow) -> String {
    format!(
        "<tr data-testid=\"bill-row\" data-bill-id=\"{id}\">\
         <td>{bill_type}</td>\
         <td>{name}</td>\
         <td><time data-testid=\"bill-date\" datetime=\"{date}\">{display_date}</time></td>\
         <td>{amount} €</td>\
         <td class=\"{status_class}\">{status_label}</td>\
         <td><div class=\"icon-actions\">\
         <div data-testid=\"icon-eye\" data-bill-url=\"{url}\"></div>\
         </div></td>\
         </tr>",
        id = bill.id,
        bill_type = escape(&bill.bill_type),
        name = escape(&bill.name),
        date = escape(&bill.date),
        display_date = escape(&bill.display_date),
        amount = bill.amount,
        status_class = bill.status_class(),
        status_label = bill.status_label(),
        url = escape(bill.file_url.as_deref().unwrap_or_default()),
    )
}

/// Receipt overlay; present but hidden until a receipt is selected.
#[must_use]
pub fn receipt_modal(receipt: Option<&str>) -> String {
    let (class, body) = match receipt {
        Some(url) => (
            "modal fade show",
            format!(
                "<div style=\"text-align: center;\" class=\"bill-proof-container\">\
                 <img width=\"500\" src=\"{}\" alt=\"Bill\" /></div>",
                escape(url)
            ),
        ),
        None => ("modal fade", String::new()),
    };
    format!(
        "<div class=\"{class}\" id=\"modaleFile\" data-testid=\"modaleFile\" tabindex=\"-1\" role=\"dialog\">\
         <div class=\"modal-dialog modal-dialog-centered modal-lg\" role=\"document\">\
         <div class=\"modal-content\">\
         <div class=\"modal-header\"><h5 class=\"modal-title\">Justificatif</h5>\
         <button type=\"button\" class=\"close\" data-testid=\"modal-close\" aria-label=\"Close\">×</button></div>\
         <div class=\"modal-body\">{body}</div>\
         </div></div></div>"
    )
}

fn list(rows: &[BillRow], receipt: Option<&str>) -> String {
    let body: String = rows.iter().map(row).collect();
    format!(
        "<div class=\"content-header\">\
         <div class=\"content-title\">{BILLS_TITLE}</div>\
         <button type=\"button\" data-testid=\"btn-new-bill\" class=\"btn btn-primary\">Nouvelle note de frais</button>\
         </div>\
         <div id=\"data-table\"><table id=\"example\" class=\"table table-striped\" style=\"width:100%\">\
         <thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead>\
         <tbody data-testid=\"tbody\">{body}</tbody>\
         </table></div>{modal}",
        modal = receipt_modal(receipt),
    )
}
