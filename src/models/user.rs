// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User record fetched from the remote listing.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A user as listed by the remote directory.
///
/// Identity is `uuid`; every other field is descriptive only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserRecord {
    pub uuid: String,
    pub name: Person,
    pub email: String,
    pub location: Location,
    pub picture: Picture,
}

impl UserRecord {
    /// Display name, e.g. "Mr John Smith".
    pub fn full_name(&self) -> String {
        [
            self.name.title.as_str(),
            self.name.first.as_str(),
            self.name.last.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Free-text postal address handed to the geocoder.
    pub fn postal_address(&self) -> String {
        format!(
            "{} {}, {}, {}",
            self.location.street.number,
            self.location.street.name,
            self.location.city,
            self.location.country
        )
    }
}

/// Person name parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Person {
    pub title: String,
    pub first: String,
    pub last: String,
}

/// Postal location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    pub street: Street,
    pub city: String,
    /// Country display name (e.g. "Canada")
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Street {
    pub number: u32,
    pub name: String,
}

/// Avatar image URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
}
