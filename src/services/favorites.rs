// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites persistence and the in-memory favorites mirror.
//!
//! Storage layout (see [`crate::db::keys`]):
//! - `favorites`: JSON array of uuids in favoriting order
//! - `favorite:{uuid}`: JSON [`FavoriteEntry`] snapshot per favorite
//!
//! Write ordering keeps the id list authoritative. Adding writes the
//! snapshot before the id list; removing rewrites the id list before
//! deleting the snapshot. A failure in between can only leave an orphaned
//! snapshot, which [`FavoritesStore::prune_orphans`] removes on next load.
//!
//! A persisted id always has a readable snapshot. Favorites added while the
//! store was failing stay out of the persisted id list, and load drops any
//! id whose snapshot is gone.

use crate::db::{keys, KeyValueStore};
use crate::error::{DirectoryError, Result};
use crate::models::{FavoriteChange, FavoriteEntry, FavoriteEvent, UserRecord};
use futures_util::{stream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tokio::sync::{broadcast, Mutex};

const MAX_CONCURRENT_STORE_OPS: usize = 16;
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// FavoritesStore - typed access to the key-value store
// ─────────────────────────────────────────────────────────────────────────────

/// Typed favorites operations over a [`KeyValueStore`].
#[derive(Clone)]
pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Read the persisted id list.
    ///
    /// Missing or malformed data is an empty list; read failures are logged
    /// and also treated as empty.
    pub async fn load_ids(&self) -> Vec<String> {
        let raw = match self.kv.get(keys::FAVORITE_IDS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                // Collapse any duplicates a foreign writer may have left behind.
                let mut seen = HashSet::new();
                ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted favorites are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Read one snapshot; a malformed snapshot reads as absent.
    pub async fn load_entry(&self, uuid: &str) -> Result<Option<FavoriteEntry>> {
        let Some(raw) = self.kv.get(&keys::favorite_record(uuid)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                tracing::warn!(uuid, error = %e, "Favorite snapshot is malformed");
                Ok(None)
            }
        }
    }

    pub async fn save_entry(&self, entry: &FavoriteEntry) -> Result<()> {
        let body = serde_json::to_string(entry)
            .map_err(|e| DirectoryError::Persistence(format!("Failed to encode favorite: {}", e)))?;
        self.kv.set(&keys::favorite_record(&entry.uuid), &body).await
    }

    pub async fn save_ids(&self, ids: &[String]) -> Result<()> {
        let body = serde_json::to_string(ids)
            .map_err(|e| DirectoryError::Persistence(format!("Failed to encode favorites: {}", e)))?;
        self.kv.set(keys::FAVORITE_IDS, &body).await
    }

    pub async fn remove_entry(&self, uuid: &str) -> Result<()> {
        self.kv.remove(&keys::favorite_record(uuid)).await
    }

    /// Delete snapshots whose uuid is not in `ids`. Returns how many were removed.
    pub async fn prune_orphans(&self, ids: &[String]) -> Result<usize> {
        let live: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let orphans: Vec<String> = self
            .kv
            .keys()
            .await?
            .into_iter()
            .filter(|key| {
                keys::favorite_uuid(key).is_some_and(|uuid| !live.contains(uuid.as_str()))
            })
            .collect();

        let count = orphans.len();
        let kv = &self.kv;
        stream::iter(orphans)
            .map(|key| async move { kv.remove(&key).await })
            .buffer_unordered(MAX_CONCURRENT_STORE_OPS)
            .collect::<Vec<Result<()>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;

        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FavoritesManager - in-memory mirror kept in sync with the store
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub change: FavoriteChange,
    /// `false` when the change only holds for this session
    pub saved: bool,
}

#[derive(Default)]
struct FavoriteSet {
    /// Favoriting order
    ids: Vec<String>,
    entries: HashMap<String, FavoriteEntry>,
    /// Session-only favorites whose add never reached the store
    unsaved: HashSet<String>,
}

impl FavoriteSet {
    fn contains(&self, uuid: &str) -> bool {
        self.ids.iter().any(|id| id == uuid)
    }

    /// The subset of `ids` that may be written to the store.
    fn durable(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| !self.unsaved.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Shared favorites state.
///
/// Reads go to an in-memory mirror and never wait on I/O. Mutations are
/// serialized by a writer lock held across the whole read-modify-write, and
/// the mirror is updated only once the persistence attempt has finished.
/// Every completed mutation is broadcast to subscribers.
pub struct FavoritesManager {
    store: FavoritesStore,
    state: RwLock<FavoriteSet>,
    write_lock: Mutex<()>,
    events: broadcast::Sender<FavoriteEvent>,
}

impl FavoritesManager {
    /// Load persisted favorites. Never fails; unreadable data means no favorites.
    pub async fn load(store: FavoritesStore) -> Self {
        let stored_ids = store.load_ids().await;

        let mut ids = Vec::with_capacity(stored_ids.len());
        let mut entries = HashMap::with_capacity(stored_ids.len());
        let mut dropped = 0usize;
        let mut read_failed = false;
        for uuid in stored_ids {
            match store.load_entry(&uuid).await {
                Ok(Some(entry)) => {
                    entries.insert(uuid.clone(), entry);
                    ids.push(uuid);
                }
                Ok(None) => {
                    tracing::warn!(uuid = %uuid, "Favorite has no snapshot, dropping it");
                    dropped += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        uuid = %uuid,
                        error = %e,
                        "Failed to read favorite, skipping it this session"
                    );
                    read_failed = true;
                }
            }
        }

        // Leave the store alone if it could not be read cleanly.
        if !read_failed {
            if dropped > 0 {
                match store.save_ids(&ids).await {
                    Ok(()) => tracing::info!(dropped, "Removed favorites without a snapshot"),
                    Err(e) => tracing::warn!(error = %e, "Failed to rewrite favorites"),
                }
            }

            match store.prune_orphans(&ids).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Pruned orphaned favorite snapshots"),
                Err(e) => tracing::warn!(error = %e, "Failed to prune favorite snapshots"),
            }
        }

        tracing::info!(count = ids.len(), "Favorites loaded");

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            state: RwLock::new(FavoriteSet {
                ids,
                entries,
                unsaved: HashSet::new(),
            }),
            write_lock: Mutex::new(()),
            events,
        }
    }

    pub fn is_favorite(&self, uuid: &str) -> bool {
        self.read().contains(uuid)
    }

    /// Favorite uuids in favoriting order.
    pub fn ids(&self) -> Vec<String> {
        self.read().ids.clone()
    }

    /// Snapshots in favoriting order.
    pub fn records(&self) -> Vec<UserRecord> {
        let state = self.read();
        state
            .ids
            .iter()
            .filter_map(|id| state.entries.get(id))
            .map(|entry| entry.user.clone())
            .collect()
    }

    pub fn record(&self, uuid: &str) -> Option<UserRecord> {
        self.read().entries.get(uuid).map(|e| e.user.clone())
    }

    pub fn len(&self) -> usize {
        self.read().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().ids.is_empty()
    }

    /// Subscribe to completed favorites mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteEvent> {
        self.events.subscribe()
    }

    /// Add `user` if absent, remove it if present.
    pub async fn toggle(&self, user: &UserRecord) -> FavoriteToggle {
        let _guard = self.write_lock.lock().await;
        if self.is_favorite(&user.uuid) {
            self.remove_locked(&user.uuid).await
        } else {
            self.add_locked(user).await
        }
    }

    /// Add `user`; `None` if it was already a favorite.
    pub async fn add(&self, user: &UserRecord) -> Option<FavoriteToggle> {
        let _guard = self.write_lock.lock().await;
        if self.is_favorite(&user.uuid) {
            return None;
        }
        Some(self.add_locked(user).await)
    }

    /// Remove `uuid`; `None` if it was not a favorite.
    pub async fn remove(&self, uuid: &str) -> Option<FavoriteToggle> {
        let _guard = self.write_lock.lock().await;
        if !self.is_favorite(uuid) {
            return None;
        }
        Some(self.remove_locked(uuid).await)
    }

    async fn add_locked(&self, user: &UserRecord) -> FavoriteToggle {
        let entry = FavoriteEntry::new(user);
        let mut ids = self.ids();
        ids.push(user.uuid.clone());

        let durable = self.read().durable(&ids);

        let persisted = match self.store.save_entry(&entry).await {
            Ok(()) => self.store.save_ids(&durable).await,
            Err(e) => Err(e),
        };
        let saved = self.log_persistence(&user.uuid, FavoriteChange::Added, persisted);

        {
            let mut state = self.write();
            state.ids = ids;
            state.entries.insert(user.uuid.clone(), entry);
            if !saved {
                state.unsaved.insert(user.uuid.clone());
            }
        }

        self.publish(&user.uuid, FavoriteChange::Added, Some(user.clone()));
        FavoriteToggle {
            change: FavoriteChange::Added,
            saved,
        }
    }

    async fn remove_locked(&self, uuid: &str) -> FavoriteToggle {
        let ids: Vec<String> = self.ids().into_iter().filter(|id| id != uuid).collect();
        let durable = self.read().durable(&ids);

        let saved = match self.store.save_ids(&durable).await {
            Ok(()) => {
                // The id list no longer references the snapshot, so a failure
                // here only leaves an orphan behind.
                if let Err(e) = self.store.remove_entry(uuid).await {
                    tracing::warn!(uuid, error = %e, "Failed to delete favorite snapshot");
                }
                true
            }
            Err(e) => self.log_persistence(uuid, FavoriteChange::Removed, Err(e)),
        };

        let record = {
            let mut state = self.write();
            state.ids = ids;
            state.unsaved.remove(uuid);
            state.entries.remove(uuid).map(|e| e.user)
        };

        self.publish(uuid, FavoriteChange::Removed, record);
        FavoriteToggle {
            change: FavoriteChange::Removed,
            saved,
        }
    }

    fn log_persistence(&self, uuid: &str, change: FavoriteChange, result: Result<()>) -> bool {
        match result {
            Ok(()) => {
                tracing::info!(uuid, ?change, "Favorite saved");
                true
            }
            Err(e) => {
                tracing::warn!(
                    uuid,
                    ?change,
                    error = %e,
                    "Favorite not saved, keeping for this session"
                );
                false
            }
        }
    }

    fn publish(&self, uuid: &str, change: FavoriteChange, record: Option<UserRecord>) {
        // No receivers is fine: no view is open.
        let _ = self.events.send(FavoriteEvent {
            uuid: uuid.to_string(),
            change,
            record,
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, FavoriteSet> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, FavoriteSet> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
