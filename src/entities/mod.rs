//! Entity module - SeaORM entity definitions for the bill store tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

/// Submitted expense bills
pub mod bill;
/// Uploaded receipt files
pub mod receipt;

pub use bill::{BillStatus, Column as BillColumn, Entity as Bill, Model as BillModel};
pub use receipt::{Column as ReceiptColumn, Entity as Receipt, Model as ReceiptModel};
