// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote user listing.
//!
//! Handles:
//! - Paged fetches from a randomuser.me-compatible API
//! - Mapping the wire format onto [`UserRecord`]
//! - Skipping individual malformed records without failing the page

use crate::config::Config;
use crate::error::{DirectoryError, Result};
use crate::models::{Person, Picture, Street, UserRecord};
use async_trait::async_trait;
use serde::Deserialize;

/// One fetched batch of users.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub users: Vec<UserRecord>,
    /// Records dropped because they did not have the expected shape
    pub skipped: usize,
}

impl Page {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users, skipped: 0 }
    }
}

/// Source of paged user listings.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch page `page` (1-based) of `page_size` records.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page>;
}

/// randomuser.me API client.
#[derive(Clone)]
pub struct RandomUserClient {
    http: reqwest::Client,
    base_url: String,
    seed: String,
    nationalities: Vec<String>,
}

impl RandomUserClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| DirectoryError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.user_api_url.clone(),
            seed: config.user_api_seed.clone(),
            nationalities: config.nationalities.clone(),
        })
    }

    fn query(&self, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page.to_string()),
            ("results", page_size.to_string()),
            ("seed", self.seed.clone()),
        ];
        if !self.nationalities.is_empty() {
            query.push(("nat", self.nationalities.join(",")));
        }
        query
    }
}

#[async_trait]
impl UserSource for RandomUserClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&self.query(page, page_size))
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, page, "User listing request failed");
            return Err(DirectoryError::Network(format!("HTTP {}: {}", status, body)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let parsed = parse_page(&body)?;
        tracing::debug!(
            page,
            count = parsed.users.len(),
            skipped = parsed.skipped,
            "Fetched user page"
        );
        Ok(parsed)
    }
}

/// Decode a listing response body.
///
/// The envelope must be well formed; individual records that do not decode
/// are counted in [`Page::skipped`].
pub fn parse_page(body: &[u8]) -> Result<Page> {
    let envelope: ListingResponse = serde_json::from_slice(body)
        .map_err(|e| DirectoryError::DataShape(format!("Invalid listing JSON: {}", e)))?;

    if let Some(error) = envelope.error {
        return Err(DirectoryError::DataShape(format!(
            "Listing API error: {}",
            error
        )));
    }

    let results = envelope
        .results
        .ok_or_else(|| DirectoryError::DataShape("Listing response has no results".to_string()))?;

    let mut page = Page::default();
    for (position, value) in results.into_iter().enumerate() {
        match serde_json::from_value::<ListedUser>(value) {
            Ok(user) if !user.login.uuid.trim().is_empty() => page.users.push(user.into()),
            Ok(_) => {
                tracing::warn!(position, "Skipping listed user without uuid");
                page.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(position, error = %e, "Skipping malformed listed user");
                page.skipped += 1;
            }
        }
    }
    Ok(page)
}

/// Listing envelope.
#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<String>,
}

/// One user as sent by the listing API.
#[derive(Debug, Deserialize)]
struct ListedUser {
    login: ListedLogin,
    name: Person,
    email: String,
    location: ListedLocation,
    picture: Picture,
}

#[derive(Debug, Deserialize)]
struct ListedLogin {
    uuid: String,
}

#[derive(Debug, Deserialize)]
struct ListedLocation {
    street: Street,
    city: String,
    country: String,
}

impl From<ListedUser> for UserRecord {
    fn from(user: ListedUser) -> Self {
        UserRecord {
            uuid: user.login.uuid,
            name: user.name,
            email: user.email,
            location: crate::models::Location {
                street: user.location.street,
                city: user.location.city,
                country: user.location.country,
            },
            picture: user.picture,
        }
    }
}
