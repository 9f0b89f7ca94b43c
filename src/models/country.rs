// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Country catalog offered by the filter bar.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A selectable country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Country {
    Brazil,
    Australia,
    Canada,
    Germany,
    France,
}

impl Country {
    /// The whole catalog, in display order.
    pub const ALL: [Country; 5] = [
        Country::Brazil,
        Country::Australia,
        Country::Canada,
        Country::Germany,
        Country::France,
    ];

    /// Name as it appears in `location.country`.
    pub fn name(self) -> &'static str {
        match self {
            Country::Brazil => "Brazil",
            Country::Australia => "Australia",
            Country::Canada => "Canada",
            Country::Germany => "Germany",
            Country::France => "France",
        }
    }

    /// ISO 3166-1 alpha-2 code.
    pub fn code(self) -> &'static str {
        match self {
            Country::Brazil => "BR",
            Country::Australia => "AU",
            Country::Canada => "CA",
            Country::Germany => "DE",
            Country::France => "FR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
