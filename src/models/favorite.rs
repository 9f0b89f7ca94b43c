// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Favorite snapshots and change notifications.

use crate::models::UserRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Persisted copy of a record taken when it was favorited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoriteEntry {
    pub uuid: String,
    pub user: UserRecord,
    /// When the record was favorited (RFC 3339, UTC)
    pub favorited_at: String,
}

impl FavoriteEntry {
    /// Snapshot `user` as favorited now.
    pub fn new(user: &UserRecord) -> Self {
        Self::at(user, Utc::now())
    }

    pub fn at(user: &UserRecord, when: DateTime<Utc>) -> Self {
        Self {
            uuid: user.uuid.clone(),
            user: user.clone(),
            favorited_at: when.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Direction of a completed favorites mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FavoriteChange {
    Added,
    Removed,
}

/// Broadcast to every open view after a favorites mutation completes.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteEvent {
    pub uuid: String,
    pub change: FavoriteChange,
    /// The record involved, when known
    pub record: Option<UserRecord>,
}
