// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Directory view model.
//!
//! Composes the feed, the country filter and the favorites mirror. Rows are
//! derived on demand from the current state, so there is no cached row list
//! to fall out of date. Every public action mutates exactly the component it
//! concerns.

use crate::error::Result;
use crate::models::{Country, FavoriteChange, FavoriteEvent, GeocodeResult, UserRecord};
use crate::services::{
    CountryFilter, FavoritesManager, FeedController, GeocodeLookup, GeocodeOutcome, Page,
    PageRequest, UserSource,
};
use crate::view::Notice;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Which listing a view model backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Paginated listing from the remote source
    All,
    /// Only favorited users; rows disappear as soon as they are unfavorited
    FavoritesOnly,
}

/// One render-ready row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    /// Position among the visible rows
    pub index: usize,
    pub record: &'a UserRecord,
    pub is_favorite: bool,
    pub is_hovered: bool,
}

impl Row<'_> {
    /// The favorite icon shows for favorites and for the hovered row.
    pub fn shows_favorite_icon(&self) -> bool {
        self.is_favorite || self.is_hovered
    }
}

/// State behind one directory listing.
pub struct DirectoryViewModel {
    kind: ViewKind,
    feed: FeedController,
    filter: CountryFilter,
    /// Hovered row index and the uuid it was showing
    hovered: Option<(usize, String)>,
    favorites: Arc<FavoritesManager>,
    favorite_events: broadcast::Receiver<FavoriteEvent>,
    source: Arc<dyn UserSource>,
    geocoder: Arc<GeocodeLookup>,
}

impl DirectoryViewModel {
    pub fn new(
        kind: ViewKind,
        feed: FeedController,
        favorites: Arc<FavoritesManager>,
        source: Arc<dyn UserSource>,
        geocoder: Arc<GeocodeLookup>,
    ) -> Self {
        let favorite_events = favorites.subscribe();
        Self {
            kind,
            feed,
            filter: CountryFilter::new(),
            hovered: None,
            favorites,
            favorite_events,
            source,
            geocoder,
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn filter(&self) -> &CountryFilter {
        &self.filter
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    /// Source to fetch a [`PageRequest`] from.
    pub fn source(&self) -> Arc<dyn UserSource> {
        Arc::clone(&self.source)
    }

    pub fn is_loading(&self) -> bool {
        self.feed.is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.kind == ViewKind::All && self.feed.has_more()
    }

    // ─── Derived rows ────────────────────────────────────────────

    /// Rows to render: filtered feed annotated with favorite and hover state.
    ///
    /// The favorites-only view also drops any row whose favorite is already
    /// gone, even before [`Self::sync_favorites`] has run.
    pub fn visible_rows(&self) -> Vec<Row<'_>> {
        self.filter
            .apply(self.feed.users())
            .into_iter()
            .map(|record| (record, self.favorites.is_favorite(&record.uuid)))
            .filter(|(_, is_favorite)| self.kind == ViewKind::All || *is_favorite)
            .enumerate()
            .map(|(index, (record, is_favorite))| Row {
                index,
                record,
                is_favorite,
                is_hovered: self
                    .hovered
                    .as_ref()
                    .is_some_and(|(i, uuid)| *i == index && *uuid == record.uuid),
            })
            .collect()
    }

    /// Hover one visible row, or none. Out-of-range indices hover nothing.
    ///
    /// Hover sticks to the user it was set on; if the rows shift under it
    /// (e.g. a favorite removed through another view) nothing is hovered.
    pub fn set_hover(&mut self, index: Option<usize>) {
        let hovered = index.and_then(|i| {
            self.visible_rows()
                .get(i)
                .map(|row| (i, row.record.uuid.clone()))
        });
        self.hovered = hovered;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.visible_rows()
            .into_iter()
            .find(|row| row.is_hovered)
            .map(|row| row.index)
    }

    // ─── Actions ─────────────────────────────────────────────────

    /// Replace the listing with a batch supplied by the host.
    pub fn load_initial(&mut self, users: Vec<UserRecord>) {
        self.hovered = None;
        self.feed.load_initial(users);
    }

    /// Toggle the favorite state of the user with `uuid`.
    pub async fn on_favorite_toggle(&mut self, uuid: &str) -> Option<Notice> {
        let record = self
            .feed
            .find(uuid)
            .cloned()
            .or_else(|| self.favorites.record(uuid));
        let Some(record) = record else {
            tracing::warn!(uuid, "Favorite toggle for a user that is not listed");
            return None;
        };

        let toggled = self.favorites.toggle(&record).await;
        if self.kind == ViewKind::FavoritesOnly && toggled.change == FavoriteChange::Removed {
            self.remove_row(uuid);
        }
        self.sync_favorites();

        (!toggled.saved).then_some(Notice::FavoriteNotSaved)
    }

    /// Flip a country in the filter. Returns whether it is now selected.
    pub fn on_country_toggle(&mut self, country: Country) -> bool {
        self.hovered = None;
        self.filter.toggle(country)
    }

    /// Claim the next page. The caller fetches it from [`Self::source`] and
    /// hands the outcome to [`Self::on_page_loaded`].
    pub fn on_load_more(&mut self) -> Option<PageRequest> {
        if self.kind == ViewKind::FavoritesOnly {
            return None;
        }
        self.feed.begin_next_page()
    }

    /// Apply a fetched page (or its failure).
    pub fn on_page_loaded(
        &mut self,
        request: PageRequest,
        outcome: Result<Page>,
    ) -> Option<Notice> {
        let skipped = outcome.as_ref().map_or(0, |page| page.skipped);
        match self.feed.finish_page(request, outcome) {
            Ok(_) if skipped > 0 => Some(Notice::SkippedRecords(skipped)),
            Ok(_) => None,
            Err(_) => Some(Notice::CouldNotLoadMore),
        }
    }

    /// Fetch and apply the next page in one step.
    pub async fn load_more(&mut self) -> Option<Notice> {
        let request = self.on_load_more()?;
        let outcome = self.source.fetch_page(request.page, request.page_size).await;
        self.on_page_loaded(request, outcome)
    }

    /// Geocode `record`'s address for the map.
    ///
    /// `Ok(None)` means a later map request superseded this one.
    pub async fn on_map_request(
        &self,
        record: &UserRecord,
    ) -> std::result::Result<Option<GeocodeResult>, Notice> {
        match self.geocoder.resolve(&record.postal_address()).await {
            Ok(GeocodeOutcome::Current(result)) => Ok(Some(result)),
            Ok(GeocodeOutcome::Superseded) => Ok(None),
            Err(e) => Err(Notice::for_map_error(&e)),
        }
    }

    /// Coordinates of the latest successful map request.
    pub fn map_location(&self) -> Option<GeocodeResult> {
        self.geocoder.current()
    }

    // ─── Favorite events ─────────────────────────────────────────

    /// Apply favorite changes made through any view.
    ///
    /// Returns whether anything affecting this view changed.
    pub fn sync_favorites(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.favorite_events.try_recv() {
                Ok(event) => {
                    self.apply_favorite_event(event);
                    changed = true;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "Favorite events lagged, resyncing");
                    if self.kind == ViewKind::FavoritesOnly {
                        self.feed.load_initial(self.favorites.records());
                        self.hovered = None;
                    }
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        changed
    }

    fn apply_favorite_event(&mut self, event: FavoriteEvent) {
        if self.kind != ViewKind::FavoritesOnly {
            return;
        }
        match event.change {
            FavoriteChange::Removed => self.remove_row(&event.uuid),
            FavoriteChange::Added => {
                if let Some(record) = event.record {
                    self.feed.push_unique(record);
                }
            }
        }
    }

    fn remove_row(&mut self, uuid: &str) {
        if self.feed.remove_uuid(uuid) > 0 {
            self.hovered = None;
        }
    }
}
