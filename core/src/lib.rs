//! Mooring Core
//!
//! Write verification and liveness coordination for Mooring -
//! peer-to-peer versioned storage for multi-device users.
//!
//! Two coupled subsystems live here:
//! - Versioned put verification: a write to a replica set is accepted only
//!   after quorum analysis of the reply codes and a follow-up digest probe
//!   that catches concurrent writers, with a deterministic winner rule
//! - Locations reconciliation: after login, the stored list of a user's
//!   client endpoints is pruned to the peers that answer a liveness
//!   challenge, and one of them is elected master of the shared message
//!   queue
//!
//! # Module Structure
//!
//! - `protocol/`: Public configuration and errors
//! - `data/`: Identifiers, storage keys, versioned content, locations
//! - `network/`: Facades over the DHT storage and messaging transports
//! - `put/`: The per-write verification state machine
//! - `reconcile/`: The per-login liveness pass
//! - `testing/`: Deterministic in-process fakes
//!
//! # Quick Start
//!
//! ```ignore
//! use mooring_core::{LocationsReconciler, ProtocolConfig, PutVerifier};
//!
//! // Verify a put against its replica set
//! let verifier = PutVerifier::new(data, ProtocolConfig::default(),
//!     location_key, content_key, content);
//! verifier.verify_put(&listener).await;
//!
//! // Prune the locations list after login
//! let reconciler = LocationsReconciler::new(network, ProtocolConfig::default());
//! let outcome = reconciler.reconcile(stored_locations).await;
//! if outcome.is_master {
//!     // this node now owns the user message queue
//! }
//! ```

pub mod data;
pub mod network;
pub mod protocol;
pub mod put;
pub mod reconcile;
pub mod testing;

// Re-export main API types for convenience
pub use data::{Id, LocationEntry, Locations, NetworkContent, PeerId, StorageKey};
pub use network::{
    choose_first, ContactPeerMessage, DataError, DataManager, DigestEntry, DigestResult,
    NetworkError, NetworkManager, PublicKey, PutStatus, RawDigestResult, RawPutResult,
    ResponseMessage,
};
pub use protocol::{ProtocolConfig, PutError, CONTACT_PEERS_AWAIT_MS, PUT_RETRIES};
pub use put::{CompletionReporter, PutListener, PutOutcome, PutVerifier};
pub use reconcile::{LocationsReconciler, ReconcileOutcome};
