// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use user_directory::config::Config;
use user_directory::db::{KeyValueStore, MemoryStore};
use user_directory::error::{DirectoryError, Result};
use user_directory::models::{Coordinates, Location, Person, Picture, Street, UserRecord};
use user_directory::services::{GeocodeSource, Page, UserSource};
use user_directory::Directory;

/// Page size used by every test directory.
#[allow(dead_code)]
pub const PAGE_SIZE: u32 = 3;

/// Check if live network tests are enabled via environment variable.
#[allow(dead_code)]
pub fn live_network_enabled() -> bool {
    std::env::var("LIVE_NETWORK_TESTS").is_ok()
}

/// Skip test with message if live network tests are not enabled.
#[macro_export]
macro_rules! require_live_network {
    () => {
        if !crate::common::live_network_enabled() {
            eprintln!("⚠️  Skipping: LIVE_NETWORK_TESTS not set");
            return;
        }
    };
}

/// Build a user with the given uuid and country.
#[allow(dead_code)]
pub fn user(uuid: &str, country: &str) -> UserRecord {
    UserRecord {
        uuid: uuid.to_string(),
        name: Person {
            title: "Mx".to_string(),
            first: format!("First-{}", uuid),
            last: "Tester".to_string(),
        },
        email: format!("{}@example.com", uuid),
        location: Location {
            street: Street {
                number: 10,
                name: "Main Street".to_string(),
            },
            city: "Springfield".to_string(),
            country: country.to_string(),
        },
        picture: Picture {
            large: format!("https://img.example.com/{}/large.jpg", uuid),
            medium: format!("https://img.example.com/{}/medium.jpg", uuid),
            thumbnail: format!("https://img.example.com/{}/thumb.jpg", uuid),
        },
    }
}

/// A full page of users with uuids `{prefix}-0..`.
#[allow(dead_code)]
pub fn page_of(prefix: &str, country: &str) -> Page {
    Page::new(
        (0..PAGE_SIZE)
            .map(|i| user(&format!("{}-{}", prefix, i), country))
            .collect(),
    )
}

#[allow(dead_code)]
pub fn uuids(users: &[UserRecord]) -> Vec<&str> {
    users.iter().map(|u| u.uuid.as_str()).collect()
}

/// User source returning queued outcomes in order; an empty queue yields
/// an empty page.
#[derive(Default)]
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<Page>>>,
    requested: Mutex<Vec<u32>>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(outcomes: Vec<Result<Page>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, outcome: Result<Page>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// Page numbers requested so far.
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserSource for ScriptedSource {
    async fn fetch_page(&self, page: u32, _page_size: u32) -> Result<Page> {
        self.requested.lock().unwrap().push(page);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

/// Geocoder whose answers are released by the test through a oneshot gate.
#[derive(Default)]
pub struct GatedGeocoder {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<Coordinates>>>>,
}

#[allow(dead_code)]
impl GatedGeocoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `address`; its lookup completes when the sender fires.
    pub fn gate(&self, address: &str) -> oneshot::Sender<Result<Coordinates>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(address.to_string(), rx);
        tx
    }

    /// Register `address` with an answer that is available immediately.
    pub fn answer(&self, address: &str, result: Result<Coordinates>) {
        let tx = self.gate(address);
        let _ = tx.send(result);
    }
}

#[async_trait]
impl GeocodeSource for GatedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        let gate = self.gates.lock().unwrap().remove(address);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(DirectoryError::Network("gate dropped".to_string()))),
            None => Err(DirectoryError::AddressNotFound(address.to_string())),
        }
    }
}

/// Test configuration with a small page size.
#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        page_size: PAGE_SIZE,
        ..Config::default()
    }
}

/// Assemble a directory over in-memory adapters.
#[allow(dead_code)]
pub async fn test_directory(
    store: Arc<MemoryStore>,
    source: Arc<ScriptedSource>,
    geocoder: Arc<GatedGeocoder>,
) -> Directory {
    let kv: Arc<dyn KeyValueStore> = store;
    Directory::new(test_config(), kv, source, geocoder).await
}
