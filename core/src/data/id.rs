//! Fixed-width identifiers
//!
//! Uses a 32-byte (256-bit) keyspace compatible with BLAKE3 hashes.
//! Version keys, hashed location/content keys, and peer identifiers all
//! live in this keyspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 32-byte identifier
///
/// Ordering is big-endian byte comparison; this is the natural order the
/// winner rule and master election compare under.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Id(pub [u8; 32]);

impl Id {
    /// Zero ID (all bytes zero) - the root sentinel for version parents
    pub const ZERO: Self = Self([0; 32]);

    /// Maximum ID (all bits set) - upper bound for digest ranges
    pub const MAX: Self = Self([0xFF; 32]);

    /// Create an Id from a byte array
    pub fn new(bytes: [u8; 32]) -> Self {
        Id(bytes)
    }

    /// Create an Id from a BLAKE3 hash of data
    pub fn from_hash(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Id(*hash.as_bytes())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Id {
    fn from(bytes: [u8; 32]) -> Self {
        Id(bytes)
    }
}

impl AsRef<[u8; 32]> for Id {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identifier of a peer in the overlay network
///
/// The transport guarantees a stable total order over peer identifiers for
/// the life of the process; master election relies on it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(pub Id);

impl PeerId {
    /// Create a PeerId from a byte array
    pub fn new(bytes: [u8; 32]) -> Self {
        PeerId(Id::new(bytes))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", hex::encode(&self.0 .0[..8]))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0 .0[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_hash() {
        let data = b"locations of some user";
        let id = Id::from_hash(data);

        // Should match direct BLAKE3 hash
        let expected = blake3::hash(data);
        assert_eq!(id.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn test_id_ordering_is_big_endian() {
        let mut low = [0u8; 32];
        low[31] = 0xFF;
        let mut high = [0u8; 32];
        high[0] = 0x01;

        // The first differing byte decides
        assert!(Id::new(low) < Id::new(high));
        assert!(Id::ZERO < Id::new(low));
        assert!(Id::new(high) < Id::MAX);
    }

    #[test]
    fn test_id_zero_and_default() {
        assert_eq!(Id::ZERO, Id::default());
        assert_eq!(Id::ZERO.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn test_id_max_is_greatest() {
        let id = Id::new([0xFE; 32]);
        assert!(id < Id::MAX);
        assert_eq!(Id::MAX.as_bytes(), &[0xFF; 32]);
    }

    #[test]
    fn test_id_debug_display() {
        let id = Id::new([0xAB; 32]);

        // Debug shows shortened hex
        let debug = format!("{:?}", id);
        assert!(debug.contains("abababab"));

        // Display shows full hex
        let display = format!("{}", id);
        assert_eq!(display.len(), 64);
    }

    #[test]
    fn test_id_from_trait() {
        let bytes = [0x42u8; 32];
        let id: Id = bytes.into();
        assert_eq!(id.as_bytes(), &bytes);
    }

    #[test]
    fn test_peer_id_order_matches_id_order() {
        let a = PeerId::new([1u8; 32]);
        let b = PeerId::new([2u8; 32]);

        assert!(a < b);
        assert_eq!(a.0.cmp(&b.0), a.cmp(&b));
    }

    #[test]
    fn test_peer_id_display_is_short_hex() {
        let peer = PeerId::new([0xCD; 32]);
        assert_eq!(format!("{}", peer), "cdcdcdcdcdcdcdcd");
    }
}
