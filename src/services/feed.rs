// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed accumulation and page bookkeeping.
//!
//! A page load is split into [`FeedController::begin_next_page`] and
//! [`FeedController::finish_page`] so the owner can keep handling user
//! actions while the fetch is outstanding. At most one page is in flight;
//! a result is applied as a single append or not at all.
//!
//! Records are never deduplicated: the same uuid arriving on two pages
//! shows up twice.

use crate::error::Result;
use crate::models::UserRecord;
use crate::services::random_user::{Page, UserSource};

/// Ticket for one in-flight page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    /// Feed generation the request was issued for
    generation: u64,
}

/// Accumulated feed plus pagination state.
#[derive(Debug, Clone)]
pub struct FeedController {
    users: Vec<UserRecord>,
    page_size: u32,
    max_pages: Option<u32>,
    next_page: u32,
    exhausted: bool,
    in_flight: Option<PageRequest>,
    /// Bumped whenever the feed is replaced wholesale
    generation: u64,
}

impl FeedController {
    pub fn new(page_size: u32, max_pages: Option<u32>) -> Self {
        Self {
            users: Vec::new(),
            page_size: page_size.max(1),
            max_pages,
            next_page: 1,
            exhausted: false,
            in_flight: None,
            generation: 0,
        }
    }

    /// Replace the feed wholesale.
    ///
    /// Pagination restarts from page 1 and any in-flight response for the
    /// previous feed will be discarded.
    pub fn load_initial(&mut self, users: Vec<UserRecord>) {
        self.users = users;
        self.next_page = 1;
        self.exhausted = false;
        self.in_flight = None;
        self.generation += 1;
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether another page may be requested.
    ///
    /// False once the source returned a short page or `max_pages` pages
    /// have been loaded.
    pub fn has_more(&self) -> bool {
        !self.exhausted && self.max_pages.map_or(true, |max| self.next_page <= max)
    }

    /// Claim the next page for fetching.
    ///
    /// Returns `None` while another page is in flight or when there is
    /// nothing more to load.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            tracing::debug!(page = self.next_page, "Page already in flight, coalescing");
            return None;
        }
        if !self.has_more() {
            return None;
        }

        let request = PageRequest {
            page: self.next_page,
            page_size: self.page_size,
            generation: self.generation,
        };
        self.in_flight = Some(request);
        Some(request)
    }

    /// Apply the outcome of a fetch started by [`Self::begin_next_page`].
    ///
    /// On success returns the number of users appended. On failure the feed
    /// is left untouched and the same page will be requested next time. A
    /// result for a request that is no longer in flight is discarded and
    /// reported as `Ok(0)`.
    pub fn finish_page(&mut self, request: PageRequest, outcome: Result<Page>) -> Result<usize> {
        if self.in_flight != Some(request) {
            tracing::debug!(
                page = request.page,
                "Discarding response for a request that is no longer current"
            );
            return Ok(0);
        }
        self.in_flight = None;

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(page = request.page, error = %e, "Failed to load page");
                return Err(e);
            }
        };

        let count = page.users.len();
        // Skipped records still count towards a full page.
        if count + page.skipped < request.page_size as usize {
            self.exhausted = true;
        }
        self.users.extend(page.users);
        self.next_page += 1;

        tracing::debug!(
            page = request.page,
            count,
            total = self.users.len(),
            has_more = self.has_more(),
            "Page appended"
        );
        Ok(count)
    }

    /// Fetch and apply the next page in one step.
    ///
    /// Returns `Ok(0)` without touching the source when nothing can be
    /// requested right now.
    pub async fn load_next_page(&mut self, source: &dyn UserSource) -> Result<usize> {
        let Some(request) = self.begin_next_page() else {
            return Ok(0);
        };
        let outcome = source.fetch_page(request.page, request.page_size).await;
        self.finish_page(request, outcome)
    }

    /// Drop every row for `uuid`. Returns how many were removed.
    pub fn remove_uuid(&mut self, uuid: &str) -> usize {
        let before = self.users.len();
        self.users.retain(|u| u.uuid != uuid);
        before - self.users.len()
    }

    /// Append a single record unless one with the same uuid is present.
    pub fn push_unique(&mut self, user: UserRecord) -> bool {
        if self.users.iter().any(|u| u.uuid == user.uuid) {
            return false;
        }
        self.users.push(user);
        true
    }

    pub fn find(&self, uuid: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.uuid == uuid)
    }
}
