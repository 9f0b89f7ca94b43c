// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed store tests.

use std::sync::Arc;
use tempfile::TempDir;
use user_directory::config::Config;
use user_directory::db::{FileStore, KeyValueStore};
use user_directory::services::{FavoritesManager, FavoritesStore};
use user_directory::Directory;

mod common;
use common::user;

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    let store = FileStore::open(&path).await.unwrap();
    store.set("favorites", r#"["a"]"#).await.unwrap();
    store.set("other", "1").await.unwrap();
    store.remove("other").await.unwrap();
    store.remove("never-set").await.unwrap();
    drop(store);

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("favorites").await.unwrap().as_deref(),
        Some(r#"["a"]"#)
    );
    assert_eq!(reopened.get("other").await.unwrap(), None);
    assert_eq!(reopened.keys().await.unwrap(), vec!["favorites"]);
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_missing_parent_directories_are_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("store.json");

    let store = FileStore::open(&path).await.unwrap();
    assert!(store.keys().await.unwrap().is_empty());
    store.set("k", "v").await.unwrap();

    assert!(path.exists());
}

#[tokio::test]
async fn test_corrupt_document_opens_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ definitely not json").unwrap();

    let store = FileStore::open(&path).await.unwrap();
    assert!(store.keys().await.unwrap().is_empty());

    store.set("k", "v").await.unwrap();
    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_unwritable_location_is_a_persistence_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    // A directory where the temp file should go makes every write fail
    std::fs::create_dir(path.with_extension("tmp")).unwrap();

    let store = FileStore::open(&path).await.unwrap();
    let err = store.set("k", "v").await.unwrap_err();

    assert!(err.is_persistence());
    // The failed write leaves the in-memory copy untouched
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_favorites_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.json");

    {
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).await.unwrap());
        let manager = FavoritesManager::load(FavoritesStore::new(kv)).await;
        assert!(manager.toggle(&user("x/1", "Canada")).await.saved);
        assert!(manager.toggle(&user("y", "Brazil")).await.saved);
        assert!(manager.toggle(&user("y", "Brazil")).await.saved);
    }

    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).await.unwrap());
    let manager = FavoritesManager::load(FavoritesStore::new(kv)).await;

    assert_eq!(manager.ids(), vec!["x/1"]);
    let records = manager.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location.country, "Canada");
}

#[tokio::test]
async fn test_from_config_uses_the_favorites_file() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        favorites_path: dir.path().join("favorites.json"),
        ..Config::default()
    };

    let directory = Directory::from_config(config).await.unwrap();
    assert!(directory.durable_favorites);
    assert!(directory.favorites.toggle(&user("a", "Canada")).await.saved);
    assert!(dir.path().join("favorites.json").exists());
}

#[tokio::test]
async fn test_unreadable_favorites_file_falls_back_to_session_favorites() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be read as the favorites document
    let config = Config {
        favorites_path: dir.path().to_path_buf(),
        ..Config::default()
    };

    let directory = Directory::from_config(config)
        .await
        .expect("engine starts without durable favorites");

    assert!(!directory.durable_favorites);
    assert!(directory.favorites.is_empty());
    directory.favorites.toggle(&user("a", "Canada")).await;
    assert!(directory.favorites.is_favorite("a"));
}
