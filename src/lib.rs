// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory engine.
//!
//! This crate holds the state behind a paginated, filterable, favoritable
//! directory of users fetched from a remote listing, plus address lookup
//! for the map display. The presentation layer drives it through
//! [`view::DirectoryViewModel`].

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod view;

use config::Config;
use db::{FileStore, KeyValueStore, MemoryStore};
use error::Result;
use services::{
    FavoritesManager, FavoritesStore, FeedController, GeocodeLookup, GeocodeSource,
    GoogleGeocoder, RandomUserClient, UserSource,
};
use std::sync::Arc;
use view::{DirectoryViewModel, Notice, ViewKind};

/// Shared engine state; one per application, any number of open views.
pub struct Directory {
    pub config: Config,
    pub favorites: Arc<FavoritesManager>,
    pub source: Arc<dyn UserSource>,
    pub geocoder: Arc<GeocodeLookup>,
    /// False when favorites could not be opened on disk and only last for
    /// this session
    pub durable_favorites: bool,
}

impl Directory {
    /// Build the production stack: file-backed favorites and HTTP sources.
    ///
    /// An unreadable favorites file does not stop the engine: favorites
    /// then live in memory for this session only.
    pub async fn from_config(config: Config) -> Result<Self> {
        let opened = FileStore::open(&config.favorites_path).await;
        let durable_favorites = opened.is_ok();
        let store: Arc<dyn KeyValueStore> = match opened {
            Ok(store) => {
                tracing::info!(path = %store.path().display(), "Favorites store opened");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    path = %config.favorites_path.display(),
                    error = %e,
                    "Favorites store unavailable, keeping favorites for this session only"
                );
                Arc::new(MemoryStore::new())
            }
        };

        let source = RandomUserClient::new(&config)?;
        let geocoder = GoogleGeocoder::new(&config)?;

        let mut directory = Self::new(config, store, Arc::new(source), Arc::new(geocoder)).await;
        directory.durable_favorites = durable_favorites;
        Ok(directory)
    }

    /// Assemble the engine from explicit adapters. Loads favorites once.
    pub async fn new(
        config: Config,
        kv: Arc<dyn KeyValueStore>,
        source: Arc<dyn UserSource>,
        geocode_source: Arc<dyn GeocodeSource>,
    ) -> Self {
        let favorites = FavoritesManager::load(FavoritesStore::new(kv)).await;
        Self {
            config,
            favorites: Arc::new(favorites),
            source,
            geocoder: Arc::new(GeocodeLookup::new(geocode_source)),
            durable_favorites: true,
        }
    }

    /// Open the main listing and load its first page.
    pub async fn open_main(&self) -> (DirectoryViewModel, Option<Notice>) {
        let mut view = self.view(ViewKind::All);
        let notice = view.load_more().await;
        (view, notice)
    }

    /// Open the favorites-only listing, seeded from the favorites snapshots.
    pub fn open_favorites(&self) -> DirectoryViewModel {
        let mut view = self.view(ViewKind::FavoritesOnly);
        view.load_initial(self.favorites.records());
        view
    }

    fn view(&self, kind: ViewKind) -> DirectoryViewModel {
        DirectoryViewModel::new(
            kind,
            FeedController::new(self.config.page_size, self.config.max_pages),
            Arc::clone(&self.favorites),
            Arc::clone(&self.source),
            Arc::clone(&self.geocoder),
        )
    }
}
