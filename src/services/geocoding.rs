// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Address geocoding for the map display.
//!
//! [`GoogleGeocoder`] owns transport details only. [`GeocodeLookup`] holds
//! the single "most recent result" slot and makes sure a slow, older lookup
//! never overwrites a newer one.

use crate::config::Config;
use crate::error::{DirectoryError, Result};
use crate::models::{Coordinates, GeocodeResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Resolves a free-text address to coordinates.
#[async_trait]
pub trait GeocodeSource: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates>;
}

/// Google Geocoding API client.
#[derive(Clone)]
pub struct GoogleGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| DirectoryError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.geocode_api_url.clone(),
            api_key: config.geocode_api_key.clone(),
        })
    }
}

#[async_trait]
impl GeocodeSource for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Network(format!("HTTP {}: {}", status, body)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        parse_geocode_response(address, &body)
    }
}

/// Decode a geocoding response, keeping only the first candidate.
pub fn parse_geocode_response(address: &str, body: &[u8]) -> Result<Coordinates> {
    let response: GeocodeResponse = serde_json::from_slice(body)
        .map_err(|e| DirectoryError::DataShape(format!("Invalid geocode JSON: {}", e)))?;

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(DirectoryError::AddressNotFound(address.to_string())),
        other => {
            let detail = response
                .error_message
                .map(|m| format!("{}: {}", other, m))
                .unwrap_or_else(|| other.to_string());
            return Err(DirectoryError::Geocoder(detail));
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| DirectoryError::AddressNotFound(address.to_string()))?;

    let coordinates = Coordinates {
        lat: first.geometry.location.lat,
        lng: first.geometry.location.lng,
    };
    if !coordinates.is_valid() {
        return Err(DirectoryError::DataShape(format!(
            "Geocoder returned out-of-range coordinates for {}",
            address
        )));
    }
    Ok(coordinates)
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    geometry: CandidateGeometry,
}

#[derive(Debug, Deserialize)]
struct CandidateGeometry {
    location: Coordinates,
}

// ─────────────────────────────────────────────────────────────────────────────
// GeocodeLookup - latest-request-wins result slot
// ─────────────────────────────────────────────────────────────────────────────

/// What happened to a lookup once it finished.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// This was the latest request; its result is now displayed.
    Current(GeocodeResult),
    /// A later request was issued while this one was pending; result dropped.
    Superseded,
}

/// Geocoder front with a single "most recent result" slot.
///
/// Lookups may overlap. Each request takes a sequence number; only the
/// holder of the newest number may write the slot, and issuing a request
/// clears the slot so old coordinates are never shown as fresh.
pub struct GeocodeLookup {
    source: Arc<dyn GeocodeSource>,
    latest: AtomicU64,
    current: Mutex<Option<GeocodeResult>>,
}

impl GeocodeLookup {
    pub fn new(source: Arc<dyn GeocodeSource>) -> Self {
        Self {
            source,
            latest: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Resolve `address`, superseding any lookup still in flight.
    ///
    /// Errors are returned to the caller even when the request is still the
    /// latest; the slot then stays empty.
    pub async fn resolve(&self, address: &str) -> Result<GeocodeOutcome> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *self.slot() = None;

        let result = self.source.geocode(address).await;

        let mut slot = self.slot();
        if self.latest.load(Ordering::SeqCst) != seq {
            tracing::debug!(address, seq, "Geocode result superseded by a later request");
            return Ok(GeocodeOutcome::Superseded);
        }

        match result {
            Ok(coordinates) => {
                let resolved = GeocodeResult {
                    address: address.to_string(),
                    coordinates,
                };
                *slot = Some(resolved.clone());
                tracing::debug!(
                    address,
                    lat = coordinates.lat,
                    lng = coordinates.lng,
                    "Address geocoded"
                );
                Ok(GeocodeOutcome::Current(resolved))
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Geocode lookup failed");
                Err(e)
            }
        }
    }

    /// The most recent successful result, if the latest request succeeded.
    pub fn current(&self) -> Option<GeocodeResult> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<GeocodeResult>> {
        // The slot holds plain data; a poisoned lock still has a usable value.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
