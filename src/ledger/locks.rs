//! Per-account lock table
//!
//! One async mutex per canonical username. Multi-account acquisition sorts
//! and dedups the names first, so two transactions over the same pair of
//! accounts always lock in the same order. A slot is dropped from the table
//! once its last holder releases it and nobody is waiting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slots = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

#[derive(Debug, Default)]
pub struct LockTable {
    slots: Arc<Slots>,
}

/// Guards for a set of accounts, released together on drop
#[derive(Debug)]
pub struct HeldLocks {
    names: Vec<String>,
    guards: Vec<OwnedMutexGuard<()>>,
    slots: Arc<Slots>,
}

impl HeldLocks {
    pub fn covers(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Drop for HeldLocks {
    fn drop(&mut self) {
        self.guards.clear();
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        for name in &self.names {
            // The table's own reference is the only one left: no holder, no waiter.
            if slots.get(name).is_some_and(|slot| Arc::strong_count(slot) == 1) {
                slots.remove(name);
            }
        }
    }
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, name: &str) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Lock every named account, in lexicographic order.
    pub async fn acquire<S: AsRef<str>>(&self, names: &[S]) -> HeldLocks {
        let mut sorted: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        sorted.sort();
        sorted.dedup();

        let mut guards = Vec::with_capacity(sorted.len());
        for name in &sorted {
            guards.push(self.slot(name).lock_owned().await);
        }

        HeldLocks {
            names: sorted,
            guards,
            slots: self.slots.clone(),
        }
    }

    /// Number of accounts currently locked or awaited
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
