// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the directory engine.

pub mod country;
pub mod favorite;
pub mod geocode;
pub mod user;

pub use country::Country;
pub use favorite::{FavoriteChange, FavoriteEntry, FavoriteEvent};
pub use geocode::{Coordinates, GeocodeResult};
pub use user::{Location, Person, Picture, Street, UserRecord};
