//! Ledger Store module
//!
//! Key-value persistence underneath the ledger. A store maps keys to either
//! an account pair or a plain string; it knows nothing about locking or
//! business rules.

mod error;
mod json_file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Account;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Key holding the shared currency name
pub const CURRENCY_KEY: &str = "currency";

/// Currency used when the store has none
pub const DEFAULT_CURRENCY: &str = "BrainCells";

/// Placeholder account written into a fresh store
pub const SCAFFOLD_ACCOUNT_KEY: &str = "default_user";

/// A value as it sits in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// `[wallet, bank]`
    Account(Account),
    Text(String),
}

impl StoredValue {
    pub fn shape(&self) -> &'static str {
        match self {
            StoredValue::Account(_) => "account",
            StoredValue::Text(_) => "text",
        }
    }
}

/// Read/write contract every persistence backend satisfies.
///
/// `set` and `set_many` only change the live view; `save` flushes it to
/// durable storage.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError>;

    async fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError>;

    /// Write several entries so that readers see all of them or none
    async fn set_many(&self, entries: Vec<(String, StoredValue)>) -> Result<(), StoreError>;

    async fn save(&self) -> Result<(), StoreError>;

    /// All keys currently present
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Contents of a store created on first run
pub fn scaffold() -> Vec<(String, StoredValue)> {
    vec![
        (
            CURRENCY_KEY.to_string(),
            StoredValue::Text(DEFAULT_CURRENCY.to_string()),
        ),
        (
            SCAFFOLD_ACCOUNT_KEY.to_string(),
            StoredValue::Account(Account::default()),
        ),
    ]
}
