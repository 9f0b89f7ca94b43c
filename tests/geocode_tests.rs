// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Latest-request-wins geocoding tests.

use futures_util::{pin_mut, poll};
use user_directory::error::DirectoryError;
use user_directory::models::Coordinates;
use user_directory::services::{GeocodeLookup, GeocodeOutcome};

mod common;
use common::GatedGeocoder;

const OTTAWA: Coordinates = Coordinates {
    lat: 45.4215,
    lng: -75.6972,
};
const BERLIN: Coordinates = Coordinates {
    lat: 52.52,
    lng: 13.405,
};

#[tokio::test]
async fn test_later_request_wins_when_earlier_resolves_last() {
    let geocoder = GatedGeocoder::new();
    let gate_x = geocoder.gate("X");
    let gate_y = geocoder.gate("Y");
    let lookup = GeocodeLookup::new(geocoder);

    let x = lookup.resolve("X");
    let y = lookup.resolve("Y");
    pin_mut!(x, y);

    assert!(poll!(x.as_mut()).is_pending());
    assert!(poll!(y.as_mut()).is_pending());
    assert!(lookup.current().is_none());

    let _ = gate_y.send(Ok(BERLIN));
    match y.await.unwrap() {
        GeocodeOutcome::Current(result) => {
            assert_eq!(result.address, "Y");
            assert_eq!(result.coordinates, BERLIN);
        }
        GeocodeOutcome::Superseded => panic!("latest request was superseded"),
    }

    let _ = gate_x.send(Ok(OTTAWA));
    assert_eq!(x.await.unwrap(), GeocodeOutcome::Superseded);

    let shown = lookup.current().expect("latest result is kept");
    assert_eq!(shown.address, "Y");
    assert_eq!(shown.coordinates, BERLIN);
}

#[tokio::test]
async fn test_superseded_error_is_not_reported() {
    let geocoder = GatedGeocoder::new();
    let gate_x = geocoder.gate("X");
    geocoder.answer("Y", Ok(OTTAWA));
    let lookup = GeocodeLookup::new(geocoder);

    let x = lookup.resolve("X");
    pin_mut!(x);
    assert!(poll!(x.as_mut()).is_pending());

    lookup.resolve("Y").await.unwrap();

    let _ = gate_x.send(Err(DirectoryError::Network("timeout".to_string())));
    assert_eq!(x.await.unwrap(), GeocodeOutcome::Superseded);
    assert_eq!(lookup.current().map(|r| r.coordinates), Some(OTTAWA));
}

#[tokio::test]
async fn test_new_request_clears_previous_result() {
    let geocoder = GatedGeocoder::new();
    geocoder.answer("X", Ok(OTTAWA));
    let gate_y = geocoder.gate("Y");
    let lookup = GeocodeLookup::new(geocoder);

    lookup.resolve("X").await.unwrap();
    assert!(lookup.current().is_some());

    let y = lookup.resolve("Y");
    pin_mut!(y);
    assert!(poll!(y.as_mut()).is_pending());
    assert!(lookup.current().is_none(), "stale result shown while pending");

    let _ = gate_y.send(Err(DirectoryError::Network("unreachable".to_string())));
    assert!(y.await.is_err());
    assert!(lookup.current().is_none());
}

#[tokio::test]
async fn test_not_found_is_distinct_from_unreachable() {
    let geocoder = GatedGeocoder::new();
    geocoder.answer(
        "down",
        Err(DirectoryError::Network("connection refused".to_string())),
    );
    let lookup = GeocodeLookup::new(geocoder);

    let err = lookup.resolve("nowhere").await.unwrap_err();
    assert!(matches!(err, DirectoryError::AddressNotFound(_)));
    assert!(!err.is_transient());

    let err = lookup.resolve("down").await.unwrap_err();
    assert!(err.is_transient());
}
