//! In-process store.

use crate::db::KeyValueStore;
use crate::error::{DirectoryError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// `DashMap`-backed store, used in tests and when no durable storage exists.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
    /// When set, writes fail as if the backing storage were unavailable.
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail (reads keep working).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DirectoryError::Persistence(
                "Store not writable (offline mode)".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|e| e.key().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_rejects_writes_but_serves_reads() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();

        store.set_offline(true);
        assert!(store.set("k", "w").await.unwrap_err().is_persistence());
        assert!(store.remove("k").await.is_err());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.set_offline(false);
        store.remove("k").await.unwrap();
        assert!(store.is_empty());
    }
}
