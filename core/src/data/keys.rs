//! Storage keys
//!
//! A stored item is addressed by the triple (location, content, version).
//! Location and content keys are free-form byte strings; the DHT addresses
//! them by their BLAKE3 hash. Digest queries cover the full version range of
//! one content item.

use serde::{Deserialize, Serialize};

use super::id::Id;

/// Full address of one stored version
///
/// Ordering is lexicographic over (location, content, version), so a range
/// from version `Id::ZERO` to `Id::MAX` covers every version of one item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct StorageKey {
    /// Hashed location key
    pub location: Id,
    /// Hashed content key
    pub content: Id,
    /// Version key
    pub version: Id,
}

impl StorageKey {
    /// Build a storage key by hashing the location and content key strings
    pub fn new(location_key: &str, content_key: &str, version: Id) -> Self {
        Self {
            location: Id::from_hash(location_key.as_bytes()),
            content: Id::from_hash(content_key.as_bytes()),
            version,
        }
    }

    /// Build a storage key from already-hashed components
    pub fn from_ids(location: Id, content: Id, version: Id) -> Self {
        Self {
            location,
            content,
            version,
        }
    }
}

/// The digest range covering every version of one content item
pub fn version_range(location_key: &str, content_key: &str) -> (StorageKey, StorageKey) {
    (
        StorageKey::new(location_key, content_key, Id::ZERO),
        StorageKey::new(location_key, content_key, Id::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_hashes_key_strings() {
        let key = StorageKey::new("locations-user-a", "user-profile", Id::ZERO);

        assert_eq!(key.location, Id::from_hash(b"locations-user-a"));
        assert_eq!(key.content, Id::from_hash(b"user-profile"));
        assert_eq!(key.version, Id::ZERO);
    }

    #[test]
    fn test_version_range_spans_all_versions() {
        let (from, to) = version_range("loc", "cnt");

        assert_eq!(from.version, Id::ZERO);
        assert_eq!(to.version, Id::MAX);
        assert_eq!(from.location, to.location);
        assert_eq!(from.content, to.content);

        // Any version of the same item falls inside the range
        let some_version = StorageKey::new("loc", "cnt", Id::new([0x42; 32]));
        assert!(from <= some_version && some_version <= to);
    }

    #[test]
    fn test_ordering_is_location_then_content_then_version() {
        let a = StorageKey::from_ids(Id::new([1; 32]), Id::new([9; 32]), Id::new([9; 32]));
        let b = StorageKey::from_ids(Id::new([2; 32]), Id::new([0; 32]), Id::new([0; 32]));
        assert!(a < b);

        let c = StorageKey::from_ids(Id::new([1; 32]), Id::new([1; 32]), Id::new([9; 32]));
        let d = StorageKey::from_ids(Id::new([1; 32]), Id::new([2; 32]), Id::new([0; 32]));
        assert!(c < d);
    }

    #[test]
    fn test_different_items_do_not_share_a_range() {
        let (_, to) = version_range("loc", "cnt-a");
        let (from_other, _) = version_range("loc", "cnt-b");

        // Keys of a different content item never fall in between
        assert_ne!(to.content, from_other.content);
    }
}
