//! Session access.
//!
//! The authentication collaborator writes a JSON document under the `user`
//! key of a browser-style key-value store. This module only reads it.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Key holding the serialized [`Session`].
pub const USER_KEY: &str = "user";

/// Environment variable read by [`EnvSessionStorage`].
pub const USER_ENV_VAR: &str = "BILLED_USER";

/// Read access to a key-value session store.
pub trait SessionStorage: Send + Sync {
    /// Value stored under `key`, if any
    fn get_item(&self, key: &str) -> Option<String>;
}

/// Kind of signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    /// Submits bills; the only type allowed on employee routes
    Employee,
    /// Reviews bills
    Admin,
}

/// Signed-in user as stored under [`USER_KEY`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// Address of the signed-in user
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// Employee session for `email`.
    #[must_use]
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Employee,
            email: Some(email.into()),
        }
    }

    /// Whether the session may use the employee views
    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }
}

/// Reads and parses the session, failing on malformed JSON.
pub fn read_session(storage: &dyn SessionStorage) -> Result<Option<Session>> {
    storage
        .get_item(USER_KEY)
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(Into::into)
}

/// Like [`read_session`] but treats a malformed payload as signed out.
#[must_use]
pub fn current_session(storage: &dyn SessionStorage) -> Option<Session> {
    read_session(storage)
        .inspect_err(|e| warn!("Ignoring unreadable session: {e}"))
        .ok()
        .flatten()
}

/// In-process key-value store, the equivalent of `window.localStorage`.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    /// Empty storage: nobody is signed in
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage already holding `session` under [`USER_KEY`].
    pub fn with_session(session: &Session) -> Result<Self> {
        let storage = Self::new();
        storage.set_item(USER_KEY, serde_json::to_string(session)?);
        Ok(storage)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    /// Removes `key`; a missing key is not an error.
    pub fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// Serves the `user` key from the `BILLED_USER` environment variable.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSessionStorage;

impl SessionStorage for EnvSessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        if key == USER_KEY {
            std::env::var(USER_ENV_VAR).ok()
        } else {
            None
        }
    }
}
