// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed store.
//!
//! The whole map lives in one JSON document. Every write replaces the
//! document through a temp file and a rename, so readers never see a
//! half-written file.

use crate::db::KeyValueStore;
use crate::error::{DirectoryError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Durable store persisted as a single JSON object on disk.
pub struct FileStore {
    path: PathBuf,
    /// In-memory copy of the document; the lock also serializes writers.
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is overwritten by the next write.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Store document is corrupt, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(DirectoryError::Persistence(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk atomically.
    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| DirectoryError::Persistence(format!("Failed to encode store: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DirectoryError::Persistence(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &body).await.map_err(|e| {
            DirectoryError::Persistence(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DirectoryError::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}
