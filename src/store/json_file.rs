//! JSON file store
//!
//! One file holding a flat JSON object: account keys map to `[wallet, bank]`
//! and `currency` maps to a string. Saves go through a sibling temp file and
//! a rename, so a crash mid-save leaves the previous file intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{scaffold, LedgerStore, MemoryStore, StoreError, StoredValue};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    live: MemoryStore,
    save_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the ledger at `path`, writing the first-run scaffold if the
    /// file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        let entries = if exists {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            serde_json::from_slice::<BTreeMap<String, StoredValue>>(&bytes).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?
        } else {
            tracing::info!(path = %path.display(), "Storage file missing, writing scaffold");
            let entries: BTreeMap<String, StoredValue> = scaffold().into_iter().collect();
            write_atomically(&path, &entries).await?;
            entries
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Storage loaded");

        Ok(Self {
            path,
            live: MemoryStore::with_entries(entries),
            save_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn write_atomically(
    path: &Path,
    entries: &BTreeMap<String, StoredValue>,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(entries)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        self.live.get(key).await
    }

    async fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.live.set(key, value).await
    }

    async fn set_many(&self, entries: Vec<(String, StoredValue)>) -> Result<(), StoreError> {
        self.live.set_many(entries).await
    }

    async fn save(&self) -> Result<(), StoreError> {
        // One writer at a time on the temp file.
        let _guard = self.save_lock.lock().await;
        let entries = self.live.snapshot().await;
        write_atomically(&self.path, &entries).await?;
        tracing::debug!(path = %self.path.display(), keys = entries.len(), "Storage saved");
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.live.keys().await
    }
}
