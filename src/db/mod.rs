//! Durable key-value storage.
//!
//! The engine only needs a string-to-string map with get/set/remove; each
//! platform supplies an adapter.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;

/// Well-known keys.
pub mod keys {
    /// JSON array of favorite uuids, in favoriting order
    pub const FAVORITE_IDS: &str = "favorites";
    /// Prefix of the per-favorite snapshot keys
    pub const FAVORITE_RECORD_PREFIX: &str = "favorite:";

    /// Snapshot key for one favorite.
    pub fn favorite_record(uuid: &str) -> String {
        format!("{}{}", FAVORITE_RECORD_PREFIX, urlencoding::encode(uuid))
    }

    /// Inverse of [`favorite_record`]; `None` for unrelated keys.
    pub fn favorite_uuid(key: &str) -> Option<String> {
        let encoded = key.strip_prefix(FAVORITE_RECORD_PREFIX)?;
        urlencoding::decode(encoded).ok().map(|s| s.into_owned())
    }
}

/// String key-value store contract.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored (order unspecified).
    async fn keys(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn test_favorite_key_round_trip() {
        let key = keys::favorite_record("a b/c");
        assert_eq!(key, "favorite:a%20b%2Fc");
        assert_eq!(keys::favorite_uuid(&key).as_deref(), Some("a b/c"));
        assert_eq!(keys::favorite_uuid(keys::FAVORITE_IDS), None);
    }
}
