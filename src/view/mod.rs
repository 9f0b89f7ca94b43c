// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presentation-facing state.
//!
//! The view model is the only part of the engine the presentation layer
//! talks to. Failures reach it as [`Notice`]s, never as raw errors.

pub mod directory;

pub use directory::{DirectoryViewModel, Row, ViewKind};

use crate::error::DirectoryError;
use std::fmt;

/// Non-blocking, user-visible signal produced by a view action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A page fetch failed; the feed is unchanged and the user may retry.
    CouldNotLoadMore,
    /// A page arrived with this many malformed records dropped.
    SkippedRecords(usize),
    /// The favorite change holds for this session only.
    FavoriteNotSaved,
    /// The geocoder found nothing for the address.
    AddressNotFound,
    /// The geocoder could not be reached or refused the request.
    MapUnavailable,
}

impl Notice {
    /// Map a geocoding failure onto what the user is told.
    ///
    /// Only a geocoder answer with no candidates is "not found". Every other
    /// failure, including a malformed reply (`DataShape`), leaves the map
    /// unavailable.
    pub fn for_map_error(err: &DirectoryError) -> Self {
        match err {
            DirectoryError::AddressNotFound(_) => Notice::AddressNotFound,
            _ => Notice::MapUnavailable,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::CouldNotLoadMore => f.write_str("Could not load more users"),
            Notice::SkippedRecords(n) => write!(f, "{} users could not be displayed", n),
            Notice::FavoriteNotSaved => f.write_str("Favorite not saved"),
            Notice::AddressNotFound => f.write_str("Address not found"),
            Notice::MapUnavailable => f.write_str("Map is unavailable right now"),
        }
    }
}
