//! Receipt entity - Uploaded attachment files referenced by bills.
//!
//! The SQLite store keeps the raw bytes here and hands out a `fileUrl`
//! built from the configured base URL and the receipt id only; the file name
//! never appears in the URL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Receipt database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    /// Identifier used in the receipt URL
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Email of the employee who uploaded the file
    pub email: String,
    /// Original file name as selected by the employee
    pub file_name: String,
    /// MIME type reported by the file input (e.g. `image/png`)
    pub content_type: String,
    /// Raw file content
    pub bytes: Vec<u8>,
    /// When the upload was stored
    pub uploaded_at: DateTimeUtc,
}

/// Receipts are referenced by URL, not by foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
