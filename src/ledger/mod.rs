//! Ledger module
//!
//! Typed access to accounts and the currency name on top of a `LedgerStore`,
//! plus the per-account serialization every balance change goes through.
//!
//! A balance change is a [`Transaction`]: lock the accounts it touches, read
//! them, compute new values, `commit`. Dropping a transaction without
//! committing writes nothing.

mod locks;

use std::sync::Arc;

use crate::domain::Account;
use crate::store::{LedgerStore, StoreError, StoredValue, CURRENCY_KEY, DEFAULT_CURRENCY};

pub use locks::{HeldLocks, LockTable};

/// Ledger error types
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Account '{0}' is not locked by this transaction")]
    NotLocked(String),
}

pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    locks: LockTable,
    autosave: bool,
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            locks: LockTable::new(),
            autosave: false,
        }
    }

    /// Flush the store after every commit
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Current currency name, falling back to the default when unset.
    pub async fn currency(&self) -> Result<String, LedgerError> {
        match self.store.get(CURRENCY_KEY).await? {
            Some(StoredValue::Text(name)) => Ok(name),
            Some(other) => Err(StoreError::WrongShape {
                key: CURRENCY_KEY.to_string(),
                expected: "text",
                found: other.shape(),
            }
            .into()),
            None => Ok(DEFAULT_CURRENCY.to_string()),
        }
    }

    pub async fn set_currency(&self, name: &str) -> Result<(), LedgerError> {
        self.store
            .set(CURRENCY_KEY, StoredValue::Text(name.to_string()))
            .await?;
        self.autosave().await;
        Ok(())
    }

    /// Unlocked point read. Fine for display; never base a write on it.
    pub async fn account(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        read_account(self.store.as_ref(), name).await
    }

    /// Create `name` with the default balances if it has no record.
    ///
    /// Returns true when the account was created.
    pub async fn ensure_account(&self, name: &str) -> Result<bool, LedgerError> {
        let tx = self.begin(&[name]).await;
        if tx.account_opt(name).await?.is_some() {
            return Ok(false);
        }
        tx.commit(vec![(name.to_string(), Account::default())]).await?;
        tracing::info!(username = %name, "Account created with default balances");
        Ok(true)
    }

    /// Lock the named accounts and open a transaction over them.
    pub async fn begin<S: AsRef<str>>(&self, names: &[S]) -> Transaction<'_> {
        let held = self.locks.acquire(names).await;
        Transaction { ledger: self, held }
    }

    /// Flush the store to durable storage.
    pub async fn save(&self) -> Result<(), LedgerError> {
        self.store.save().await?;
        Ok(())
    }

    /// Flush after a change is already live. A failed flush leaves the
    /// change in place for the next save to persist.
    async fn autosave(&self) {
        if !self.autosave {
            return;
        }
        if let Err(e) = self.store.save().await {
            tracing::error!(error = %e, "Autosave failed, keeping change for the next save");
        }
    }
}

async fn read_account(store: &dyn LedgerStore, name: &str) -> Result<Option<Account>, LedgerError> {
    match store.get(name).await? {
        Some(StoredValue::Account(account)) => Ok(Some(account)),
        Some(other) => Err(StoreError::WrongShape {
            key: name.to_string(),
            expected: "account",
            found: other.shape(),
        }
        .into()),
        None => Ok(None),
    }
}

/// Exclusive access to a set of accounts from first read to final write
pub struct Transaction<'a> {
    ledger: &'a Ledger,
    held: HeldLocks,
}

impl Transaction<'_> {
    fn check(&self, name: &str) -> Result<(), LedgerError> {
        if self.held.covers(name) {
            Ok(())
        } else {
            Err(LedgerError::NotLocked(name.to_string()))
        }
    }

    pub async fn account_opt(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        self.check(name)?;
        read_account(self.ledger.store.as_ref(), name).await
    }

    /// Read a locked account; a missing record reads as the default balances.
    pub async fn account(&self, name: &str) -> Result<Account, LedgerError> {
        Ok(self.account_opt(name).await?.unwrap_or_default())
    }

    /// Write all changes as one unit and release the locks.
    pub async fn commit(self, changes: Vec<(String, Account)>) -> Result<(), LedgerError> {
        for (name, _) in &changes {
            self.check(name)?;
        }
        let entries = changes
            .into_iter()
            .map(|(name, account)| (name, StoredValue::Account(account)))
            .collect();
        self.ledger.store.set_many(entries).await?;
        // Committed from here on. Locks stay held through the flush.
        self.ledger.autosave().await;
        Ok(())
    }
}
