// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the directory engine.
//!
//! Errors never cross into the view layer as-is: the view model converts
//! them into a [`crate::view::Notice`].

/// Engine error type.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Transport failure or non-success HTTP status (service unreachable).
    #[error("Network error: {0}")]
    Network(String),

    /// The geocoder answered but found no candidate for the address.
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// The geocoder refused the request (bad key, quota, invalid request).
    #[error("Geocoder error: {0}")]
    Geocoder(String),

    /// A remote payload did not have the expected shape.
    #[error("Malformed payload: {0}")]
    DataShape(String),

    /// Durable store read or write failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DirectoryError {
    /// Whether the user may simply re-trigger the action.
    ///
    /// Nothing is retried automatically.
    pub fn is_transient(&self) -> bool {
        matches!(self, DirectoryError::Network(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, DirectoryError::Persistence(_))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, DirectoryError>;
