//! Known client endpoints of a user
//!
//! A user may be logged in from several devices at once. The locations list
//! records the peer addresses of all of them; the post-login liveness pass
//! prunes it down to the responsive ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::id::PeerId;

/// One known client endpoint
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct LocationEntry {
    peer: PeerId,
}

impl LocationEntry {
    pub fn new(peer: PeerId) -> Self {
        Self { peer }
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }
}

/// The set of a user's known client endpoints
///
/// Uniqueness is by PeerId. After reconciliation the set contains the local
/// peer exactly once.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Locations {
    user_id: String,
    entries: BTreeSet<LocationEntry>,
}

impl Locations {
    /// Create an empty locations list for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            entries: BTreeSet::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Add an entry; a second entry for the same peer is a no-op
    pub fn add_entry(&mut self, entry: LocationEntry) {
        self.entries.insert(entry);
    }

    /// Remove the entry for a peer, if present
    pub fn remove_entry(&mut self, peer: PeerId) -> bool {
        self.entries.remove(&LocationEntry::new(peer))
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.entries.contains(&LocationEntry::new(peer))
    }

    /// Iterate entries in peer order
    pub fn entries(&self) -> impl Iterator<Item = &LocationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(seed: u8) -> PeerId {
        PeerId::new([seed; 32])
    }

    #[test]
    fn test_entries_are_unique_by_peer() {
        let mut locations = Locations::new("user-a");
        locations.add_entry(LocationEntry::new(peer(1)));
        locations.add_entry(LocationEntry::new(peer(1)));
        locations.add_entry(LocationEntry::new(peer(2)));

        assert_eq!(locations.len(), 2);
        assert!(locations.contains(peer(1)));
        assert!(locations.contains(peer(2)));
    }

    #[test]
    fn test_remove_entry() {
        let mut locations = Locations::new("user-a");
        locations.add_entry(LocationEntry::new(peer(1)));

        assert!(locations.remove_entry(peer(1)));
        assert!(!locations.remove_entry(peer(1)));
        assert!(locations.is_empty());
    }

    #[test]
    fn test_entries_iterate_in_peer_order() {
        let mut locations = Locations::new("user-a");
        locations.add_entry(LocationEntry::new(peer(3)));
        locations.add_entry(LocationEntry::new(peer(1)));
        locations.add_entry(LocationEntry::new(peer(2)));

        let peers: Vec<PeerId> = locations.entries().map(|e| e.peer()).collect();
        assert_eq!(peers, vec![peer(1), peer(2), peer(3)]);
    }
}
