//! Shared test utilities.
//!
//! Fixture bills, payload builders and store setup with sensible defaults.

use crate::{
    core::session::{MemorySessionStorage, Session},
    entities::{BillModel, BillStatus},
    errors::Result,
    store::{NewBill, SqliteBillStore},
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// `SQLite` store over a fresh in-memory database, receipts under `/receipts`.
pub async fn setup_test_store() -> Result<SqliteBillStore> {
    init_test_tracing();
    let db = setup_test_db().await?;
    Ok(SqliteBillStore::new(db, "/receipts".to_string()))
}

/// Session storage holding an employee signed in as `a@a`.
pub fn employee_storage() -> MemorySessionStorage {
    let storage = MemorySessionStorage::new();
    storage.set_item(
        crate::core::session::USER_KEY,
        r#"{"type":"Employee","email":"a@a"}"#,
    );
    storage
}

/// The session held by [`employee_storage`].
pub fn employee_session() -> Session {
    Session::employee("a@a")
}

/// Pending bill with a receipt attached.
///
/// # Defaults
/// * `type`: "Transports"
/// * `amount`: 100.0, `pct`: 20
/// * `email`: "a@a"
pub fn make_bill(id: i64, name: &str, date: &str) -> BillModel {
    BillModel {
        id,
        email: "a@a".to_string(),
        bill_type: "Transports".to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount: 100.0,
        vat: Some(20.0),
        pct: 20,
        commentary: None,
        file_url: Some(format!("https://test.storage.tld/receipts/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        status: BillStatus::Pending,
        comment_admin: None,
    }
}

/// Create payload with the same defaults as [`make_bill`].
pub fn make_new_bill(name: &str, date: &str) -> NewBill {
    NewBill {
        email: "a@a".to_string(),
        bill_type: "Transports".to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount: 100.0,
        vat: None,
        pct: 20,
        commentary: None,
        file_url: "/receipts/1".to_string(),
        file_name: "receipt.png".to_string(),
        status: BillStatus::Pending,
    }
}

/// Four bills in no particular date order, one per status at least.
pub fn fixture_bills() -> Vec<BillModel> {
    vec![
        BillModel {
            bill_type: "Hôtel et logement".to_string(),
            amount: 400.0,
            vat: Some(80.0),
            commentary: Some("séminaire billed".to_string()),
            ..make_bill(1, "encore", "2004-04-04")
        },
        BillModel {
            bill_type: "Services en ligne".to_string(),
            status: BillStatus::Refused,
            comment_admin: Some("en fait non".to_string()),
            ..make_bill(2, "test1", "2001-01-01")
        },
        BillModel {
            bill_type: "Restaurants et bars".to_string(),
            amount: 300.0,
            status: BillStatus::Accepted,
            comment_admin: Some("bon bah d'accord".to_string()),
            ..make_bill(3, "test3", "2003-03-03")
        },
        BillModel {
            amount: 200.0,
            status: BillStatus::Refused,
            comment_admin: Some("pas la bonne facture".to_string()),
            ..make_bill(4, "test2", "2002-02-02")
        },
    ]
}
