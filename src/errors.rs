//! Unified error type for the crate.
//!
//! Validation problems found while editing a bill are not errors: the
//! submission controller reports them as form state. Everything here is a
//! failure the caller has to surface.

use crate::entities::bill::BillStatus;
use thiserror::Error;

/// Everything that can go wrong outside form validation.
#[derive(Debug, Error)]
pub enum Error {
    /// Unreadable or invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong and where
        message: String,
    },

    /// SeaORM failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Failure reported by a bill store. Displayed verbatim to the user.
    #[error("{message}")]
    Store {
        /// User-facing text, e.g. `Erreur 404`
        message: String,
    },

    /// No bill with this id in the store
    #[error("Bill not found: {id}")]
    BillNotFound {
        /// Requested id
        id: i64,
    },

    /// Status change other than `pending -> accepted | refused`
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status
        from: BillStatus,
        /// Requested status
        to: BillStatus,
    },

    /// Session document is not valid JSON
    #[error("Invalid session payload: {0}")]
    Session(#[from] serde_json::Error),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or non-UTF-8 environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// The store worker task is gone
    #[error("Store worker stopped")]
    WorkerStopped,
}

impl Error {
    /// Builds a store failure carrying a user-facing message such as `Erreur 404`.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_displays_message_verbatim() {
        assert_eq!(Error::store("Erreur 404").to_string(), "Erreur 404");
        assert_eq!(Error::store("Erreur 500").to_string(), "Erreur 500");
    }

    #[test]
    fn test_transition_error_names_both_statuses() {
        let err = Error::InvalidStatusTransition {
            from: BillStatus::Accepted,
            to: BillStatus::Refused,
        };
        assert_eq!(err.to_string(), "Invalid status transition: accepted -> refused");
    }
}
