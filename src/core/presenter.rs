//! Bill list presentation.
//!
//! Turns store records into rows ready for the bills view. Ordering compares
//! the raw ISO dates as strings, which for `YYYY-MM-DD` is chronological.

use crate::entities::{BillModel, BillStatus};
use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// One displayable bill.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    /// Store identifier of the bill
    pub id: i64,
    /// Raw ISO date as stored
    pub date: String,
    /// Human date, or the raw value when it cannot be parsed
    pub display_date: String,
    /// Name of the expense
    pub name: String,
    /// Expense category
    pub bill_type: String,
    /// Amount including taxes
    pub amount: f64,
    /// Review status
    pub status: BillStatus,
    /// URL of the receipt image
    pub file_url: Option<String>,
    /// Name of the receipt file
    pub file_name: Option<String>,
}

impl BillRow {
    /// Row for `bill`, with its human date computed.
    #[must_use]
    pub fn from_bill(bill: &BillModel) -> Self {
        Self {
            id: bill.id,
            date: bill.date.clone(),
            display_date: format_date(&bill.date).unwrap_or_else(|| bill.date.clone()),
            name: bill.name.clone(),
            bill_type: bill.bill_type.clone(),
            amount: bill.amount,
            status: bill.status,
            file_url: bill.file_url.clone(),
            file_name: bill.file_name.clone(),
        }
    }

    /// French label of the row status
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        status_label(self.status)
    }

    /// CSS class of the row status
    #[must_use]
    pub const fn status_class(&self) -> &'static str {
        status_class(self.status)
    }
}

/// What the bills view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    /// Fetch outstanding
    Loading,
    /// Store failure, displayed verbatim
    Error(String),
    /// Rows, most recent first
    List(Vec<BillRow>),
}

/// Builds the bills page.
///
/// `loading` wins over `error`, which wins over `bills`.
#[must_use]
pub fn present(bills: &[BillModel], loading: bool, error: Option<&str>) -> BillsPage {
    if loading {
        return BillsPage::Loading;
    }
    if let Some(message) = error {
        return BillsPage::Error(message.to_string());
    }

    let mut rows: Vec<BillRow> = bills.iter().map(BillRow::from_bill).collect();
    sort_anti_chronological(&mut rows);
    BillsPage::List(rows)
}

/// Most recent date first; equal dates keep their input order.
pub fn sort_anti_chronological(rows: &mut [BillRow]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Formats `2004-04-04` as `4 Avr. 04`.
#[must_use]
pub fn format_date(raw: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    let month = MONTHS.get(date.month0() as usize)?;
    Some(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

/// French label of `status`
#[must_use]
pub const fn status_label(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refusé",
    }
}

/// CSS class used to colour the status cell
#[must_use]
pub const fn status_class(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "status-pending",
        BillStatus::Accepted => "status-accepted",
        BillStatus::Refused => "status-refused",
    }
}

/// State backing the bills view between a fetch and its result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillsListState {
    /// Last list received from the store
    pub bills: Vec<BillModel>,
    /// A fetch is outstanding
    pub loading: bool,
    /// Failure to show instead of the list
    pub error: Option<String>,
}

impl BillsListState {
    /// Fresh state for a fetch that has just been requested
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Records the fetched bills and ends loading.
    pub fn loaded(&mut self, bills: Vec<BillModel>) {
        self.bills = bills;
        self.loading = false;
    }

    /// Records a failure; it stays visible even if a list arrives afterwards.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Page to render for the current state
    #[must_use]
    pub fn page(&self) -> BillsPage {
        present(&self.bills, self.loading, self.error.as_deref())
    }
}
