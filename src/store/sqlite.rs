//! `SQLite` bill store.
//!
//! Bills and receipt files live in two tables created from the entity
//! definitions. Receipt URLs are `<receipt_base_url>/<receipt id>`; the file
//! name is kept on the bill as `fileName` so it never needs URL encoding.

use super::{BillStore, BillUpdate, NewBill, ReceiptUpload};
use crate::config::{StoreConfig, database};
use crate::entities::{Bill, BillColumn, BillModel, Receipt, ReceiptModel, bill, receipt};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// [`BillStore`] backed by a SeaORM connection.
pub struct SqliteBillStore {
    db: DatabaseConnection,
    receipt_base_url: String,
}

impl SqliteBillStore {
    /// Wraps an open connection whose tables already exist.
    ///
    /// # Arguments
    /// * `db` - Connection to the bill database
    /// * `receipt_base_url` - Prefix of the URLs returned by `upload`
    #[must_use]
    pub const fn new(db: DatabaseConnection, receipt_base_url: String) -> Self {
        Self {
            db,
            receipt_base_url,
        }
    }

    /// Connects using `config` and makes sure the tables exist.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let db = database::create_connection(&config.database_url).await?;
        database::create_tables(&db).await?;
        Ok(Self::new(db, config.receipt_base_url.clone()))
    }

    /// Underlying connection, for direct queries
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Looks up a stored receipt by id.
    pub async fn receipt(&self, receipt_id: i64) -> Result<Option<ReceiptModel>> {
        Receipt::find_by_id(receipt_id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    fn receipt_url(&self, receipt_id: i64) -> String {
        format!("{}/{receipt_id}", self.receipt_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl BillStore for SqliteBillStore {
    /// All bills in insertion order. Display ordering belongs to the presenter.
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<BillModel>> {
        Bill::find()
            .order_by_asc(BillColumn::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self, payload), fields(email = %payload.email))]
    async fn create(&self, payload: NewBill) -> Result<BillModel> {
        let model = bill::ActiveModel {
            email: Set(payload.email),
            bill_type: Set(payload.bill_type),
            name: Set(payload.name),
            date: Set(payload.date),
            amount: Set(payload.amount),
            vat: Set(payload.vat),
            pct: Set(payload.pct),
            commentary: Set(payload.commentary),
            file_url: Set(Some(payload.file_url)),
            file_name: Set(Some(payload.file_name)),
            status: Set(payload.status),
            comment_admin: Set(None),
            ..Default::default()
        };

        let created = model.insert(&self.db).await?;
        info!(id = created.id, "bill created");
        Ok(created)
    }

    #[instrument(skip(self), fields(id = update.id))]
    async fn update(&self, update: BillUpdate) -> Result<BillModel> {
        let txn = self.db.begin().await?;

        let current = Bill::find_by_id(update.id)
            .one(&txn)
            .await?
            .ok_or(Error::BillNotFound { id: update.id })?;

        let mut changed = current.clone();
        update.apply_to(&mut changed)?;

        let mut active: bill::ActiveModel = current.into();
        active.status = Set(changed.status);
        active.comment_admin = Set(changed.comment_admin);
        active.file_url = Set(changed.file_url);
        active.file_name = Set(changed.file_name);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn upload(&self, file: ReceiptUpload) -> Result<String> {
        let model = receipt::ActiveModel {
            email: Set(file.email),
            file_name: Set(file.file_name),
            content_type: Set(file.content_type),
            bytes: Set(file.bytes),
            uploaded_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let stored = model.insert(&self.db).await?;
        Ok(self.receipt_url(stored.id))
    }
}
