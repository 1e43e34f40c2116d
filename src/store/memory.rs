//! In-memory bill store.
//!
//! Used by tests and by shells that have no database. Each operation can be
//! told to fail with a given message, which is how `Erreur 404` / `Erreur 500`
//! responses are simulated.

use super::{BillStore, BillUpdate, NewBill, ReceiptUpload};
use crate::entities::BillModel;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryState {
    bills: Vec<BillModel>,
    next_id: i64,
    uploads: Vec<ReceiptUpload>,
    list_failure: Option<String>,
    create_failure: Option<String>,
    update_failure: Option<String>,
    upload_failure: Option<String>,
}

#[derive(Debug, Default)]
struct CallCounts {
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    upload: AtomicUsize,
}

/// Bill store kept in process memory.
///
/// Counts every call so tests can assert how often the store was reached.
#[derive(Debug, Default)]
pub struct InMemoryBillStore {
    state: Mutex<MemoryState>,
    calls: CallCounts,
}

impl InMemoryBillStore {
    /// Empty store where every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `bills`; new ids continue after the highest one.
    #[must_use]
    pub fn with_bills(bills: Vec<BillModel>) -> Self {
        let next_id = bills.iter().map(|bill| bill.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState {
                bills,
                next_id,
                ..MemoryState::default()
            }),
            calls: CallCounts::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every later `list` fail with `message`.
    pub fn fail_list_with(&self, message: impl Into<String>) {
        self.state().list_failure = Some(message.into());
    }

    /// Makes every later `create` fail with `message`.
    pub fn fail_create_with(&self, message: impl Into<String>) {
        self.state().create_failure = Some(message.into());
    }

    /// Makes every later `update` fail with `message`.
    pub fn fail_update_with(&self, message: impl Into<String>) {
        self.state().update_failure = Some(message.into());
    }

    /// Makes every later `upload` fail with `message`.
    pub fn fail_upload_with(&self, message: impl Into<String>) {
        self.state().upload_failure = Some(message.into());
    }

    /// Snapshot of the stored bills in insertion order
    #[must_use]
    pub fn bills(&self) -> Vec<BillModel> {
        self.state().bills.clone()
    }

    /// Receipts accepted so far, in upload order
    #[must_use]
    pub fn uploads(&self) -> Vec<ReceiptUpload> {
        self.state().uploads.clone()
    }

    /// Number of `list` calls, failed ones included
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    /// Number of `create` calls, failed ones included
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    /// Number of `update` calls, failed ones included
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }

    /// Number of `upload` calls, failed ones included
    #[must_use]
    pub fn upload_calls(&self) -> usize {
        self.calls.upload.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn list(&self) -> Result<Vec<BillModel>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if let Some(message) = &state.list_failure {
            return Err(Error::store(message.clone()));
        }
        Ok(state.bills.clone())
    }

    async fn create(&self, bill: NewBill) -> Result<BillModel> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        if let Some(message) = &state.create_failure {
            return Err(Error::store(message.clone()));
        }

        state.next_id += 1;
        let created = BillModel {
            id: state.next_id,
            email: bill.email,
            bill_type: bill.bill_type,
            name: bill.name,
            date: bill.date,
            amount: bill.amount,
            vat: bill.vat,
            pct: bill.pct,
            commentary: bill.commentary,
            file_url: Some(bill.file_url),
            file_name: Some(bill.file_name),
            status: bill.status,
            comment_admin: None,
        };
        debug!(id = created.id, "bill created in memory");
        state.bills.push(created.clone());
        Ok(created)
    }

    async fn update(&self, update: BillUpdate) -> Result<BillModel> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        if let Some(message) = &state.update_failure {
            return Err(Error::store(message.clone()));
        }

        let bill = state
            .bills
            .iter_mut()
            .find(|bill| bill.id == update.id)
            .ok_or(Error::BillNotFound { id: update.id })?;
        update.apply_to(bill)?;
        Ok(bill.clone())
    }

    async fn upload(&self, receipt: ReceiptUpload) -> Result<String> {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        if let Some(message) = &state.upload_failure {
            return Err(Error::store(message.clone()));
        }

        debug!(file_name = %receipt.file_name, email = %receipt.email, "receipt kept in memory");
        state.uploads.push(receipt);
        Ok(format!("memory://receipts/{}", state.uploads.len()))
    }
}
