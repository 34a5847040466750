//! Versioned content objects

use serde::{Deserialize, Serialize};

use super::id::Id;

/// One immutable revision of a content item
///
/// `based_on_key` names the parent revision; root revisions use the zero
/// sentinel. A content object never changes once published - updates create
/// a new version on top of it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NetworkContent {
    /// Version key of this revision
    pub version_key: Id,
    /// Version key of the parent revision, `Id::ZERO` for roots
    pub based_on_key: Id,
    /// Opaque payload
    pub payload: Vec<u8>,
}

impl NetworkContent {
    /// Create a new revision on top of a parent
    pub fn new(version_key: Id, based_on_key: Id, payload: Vec<u8>) -> Self {
        Self {
            version_key,
            based_on_key,
            payload,
        }
    }
}
