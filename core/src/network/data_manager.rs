//! DHT storage facade
//!
//! The data manager issues `put`, `remove_version`, and `get_digest` over
//! the DHT. The transport behind it is opaque; the put verifier only sees
//! per-replica reply codes and version digests.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::{Id, NetworkContent, PeerId, StorageKey};

/// Reply code of one replica for one stored key
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PutStatus {
    /// The replica accepted the write
    Ok,
    /// The replica denied the write
    Failed,
    /// The replica denied the write because the key was not absent
    FailedNotAbsent,
    /// The replica denied the write for security reasons
    FailedSecurity,
    /// The replica detected a version conflict
    VersionConflict,
    /// The replica detected a version conflict: unknown based-on key
    VersionConflictNoBasedOn,
    /// The replica detected a version conflict: missing version key
    VersionConflictNoVersionKey,
    /// The replica detected a version conflict: stale timestamp
    VersionConflictOldTimestamp,
}

impl PutStatus {
    /// Hard failure, counted in the fail majority test
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PutStatus::Failed | PutStatus::FailedNotAbsent | PutStatus::FailedSecurity
        )
    }

    /// Conflict signal; any one fails the whole put immediately
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            PutStatus::VersionConflict
                | PutStatus::VersionConflictNoBasedOn
                | PutStatus::VersionConflictNoVersionKey
                | PutStatus::VersionConflictOldTimestamp
        )
    }
}

impl fmt::Display for PutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PutStatus::Ok => "ok",
            PutStatus::Failed => "failed",
            PutStatus::FailedNotAbsent => "failed, not absent",
            PutStatus::FailedSecurity => "failed, security",
            PutStatus::VersionConflict => "version conflict",
            PutStatus::VersionConflictNoBasedOn => "version conflict, no based-on",
            PutStatus::VersionConflictNoVersionKey => "version conflict, no version key",
            PutStatus::VersionConflictOldTimestamp => "version conflict, old timestamp",
        };
        write!(f, "{}", name)
    }
}

/// Raw per-replica result of a put
///
/// A replica contributing `None` gave no status back and counts as a single
/// failure for that replica.
pub type RawPutResult = HashMap<PeerId, Option<HashMap<StorageKey, PutStatus>>>;

/// One entry of a peer's key digest: a version and its parent
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DigestEntry {
    /// Version key of the entry
    pub version_key: Id,
    /// Version key of its parent revision
    pub based_on: Id,
}

/// A peer's report of the versions it holds for one content item
///
/// Entries are ordered newest first, mirroring the key order the replica
/// stores them in.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct DigestResult {
    entries: Vec<DigestEntry>,
}

impl DigestResult {
    /// Build a digest from newest-first entries
    pub fn new(entries: Vec<DigestEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The newest entry the peer holds
    pub fn first(&self) -> Option<&DigestEntry> {
        self.entries.first()
    }

    /// Whether any entry carries this version key
    pub fn contains_version(&self, version_key: Id) -> bool {
        self.entries.iter().any(|e| e.version_key == version_key)
    }

    /// The first entry whose parent equals `based_on`, if any
    pub fn successor_of(&self, based_on: Id) -> Option<&DigestEntry> {
        self.entries.iter().find(|e| e.based_on == based_on)
    }
}

/// Per-peer digest responses
pub type RawDigestResult = HashMap<PeerId, Option<DigestResult>>;

/// Errors surfaced by the storage transport
#[derive(Debug)]
pub enum DataError {
    /// The underlying DHT operation failed outright
    Transport(String),
    /// The operation did not complete in time
    Timeout,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Transport(e) => write!(f, "transport error: {}", e),
            DataError::Timeout => write!(f, "operation timed out"),
        }
    }
}

impl std::error::Error for DataError {}

/// Storage operations over the DHT
#[async_trait]
pub trait DataManager: Send + Sync {
    /// Store one version of a content item on its replica set
    async fn put(
        &self,
        location_key: &str,
        content_key: &str,
        content: &NetworkContent,
    ) -> Result<RawPutResult, DataError>;

    /// Remove one version from the replicas that hold it, best effort
    async fn remove_version(
        &self,
        location_key: &str,
        content_key: &str,
        version_key: Id,
    ) -> Result<(), DataError>;

    /// Collect each replica's version digest for the given key range
    async fn get_digest(
        &self,
        location_key: &str,
        from: StorageKey,
        to: StorageKey,
    ) -> Result<RawDigestResult, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_status_predicates() {
        assert!(!PutStatus::Ok.is_failure());
        assert!(!PutStatus::Ok.is_conflict());

        for status in [
            PutStatus::Failed,
            PutStatus::FailedNotAbsent,
            PutStatus::FailedSecurity,
        ] {
            assert!(status.is_failure(), "{} should be a failure", status);
            assert!(!status.is_conflict());
        }

        for status in [
            PutStatus::VersionConflict,
            PutStatus::VersionConflictNoBasedOn,
            PutStatus::VersionConflictNoVersionKey,
            PutStatus::VersionConflictOldTimestamp,
        ] {
            assert!(status.is_conflict(), "{} should be a conflict", status);
            assert!(!status.is_failure());
        }
    }

    #[test]
    fn test_digest_first_is_newest() {
        let newest = DigestEntry {
            version_key: Id::new([3; 32]),
            based_on: Id::new([2; 32]),
        };
        let older = DigestEntry {
            version_key: Id::new([2; 32]),
            based_on: Id::new([1; 32]),
        };
        let digest = DigestResult::new(vec![newest, older]);

        assert_eq!(digest.first(), Some(&newest));
    }

    #[test]
    fn test_digest_contains_version() {
        let digest = DigestResult::new(vec![DigestEntry {
            version_key: Id::new([7; 32]),
            based_on: Id::ZERO,
        }]);

        assert!(digest.contains_version(Id::new([7; 32])));
        assert!(!digest.contains_version(Id::new([8; 32])));
    }

    #[test]
    fn test_digest_successor_of_finds_first_child() {
        let parent = Id::new([1; 32]);
        let child_a = DigestEntry {
            version_key: Id::new([5; 32]),
            based_on: parent,
        };
        let child_b = DigestEntry {
            version_key: Id::new([6; 32]),
            based_on: parent,
        };
        let digest = DigestResult::new(vec![child_a, child_b]);

        // First match in digest order wins
        assert_eq!(digest.successor_of(parent), Some(&child_a));
        assert_eq!(digest.successor_of(Id::new([9; 32])), None);
    }

    #[test]
    fn test_empty_digest() {
        let digest = DigestResult::default();
        assert!(digest.is_empty());
        assert_eq!(digest.first(), None);
    }

    #[test]
    fn test_data_error_display() {
        let err = DataError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "transport error: connection reset");

        let err = DataError::Timeout;
        assert_eq!(err.to_string(), "operation timed out");
    }
}
