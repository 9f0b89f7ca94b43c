// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - engine components and remote sources.

pub mod favorites;
pub mod feed;
pub mod filter;
pub mod geocoding;
pub mod random_user;

pub use favorites::{FavoriteToggle, FavoritesManager, FavoritesStore};
pub use feed::{FeedController, PageRequest};
pub use filter::CountryFilter;
pub use geocoding::{GeocodeLookup, GeocodeOutcome, GeocodeSource, GoogleGeocoder};
pub use random_user::{Page, RandomUserClient, UserSource};
