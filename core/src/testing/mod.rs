//! Testing utilities
//!
//! In-process fakes for the two transport facades, so verifier and
//! reconciler behavior can be tested deterministically without a network.

pub mod data;
pub mod network;

pub use data::ScriptedDataManager;
pub use network::{PeerBehavior, ScriptedNetwork};

use rand::Rng;

use crate::data::PeerId;

/// A fresh random peer identifier
pub fn random_peer() -> PeerId {
    PeerId::new(rand::thread_rng().gen())
}
