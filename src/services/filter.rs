// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Country filter over the feed.

use crate::models::{Country, UserRecord};
use std::collections::BTreeSet;

/// Selected countries. Empty selection shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    selected: BTreeSet<Country>,
}

impl CountryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `country` in the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, country: Country) -> bool {
        if self.selected.remove(&country) {
            false
        } else {
            self.selected.insert(country);
            true
        }
    }

    pub fn is_selected(&self, country: Country) -> bool {
        self.selected.contains(&country)
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = Country> + '_ {
        self.selected.iter().copied()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn matches(&self, user: &UserRecord) -> bool {
        !self.is_active()
            || self
                .selected
                .iter()
                .any(|c| c.name() == user.location.country)
    }

    /// The users passing the filter, in feed order.
    pub fn apply<'a>(&self, feed: &'a [UserRecord]) -> Vec<&'a UserRecord> {
        feed.iter().filter(|user| self.matches(user)).collect()
    }
}

impl FromIterator<Country> for CountryFilter {
    fn from_iter<I: IntoIterator<Item = Country>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
