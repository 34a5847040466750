//! Network layer
//!
//! Facades over the two transports the core depends on, plus the wire
//! messages of the liveness probe:
//! - `data_manager`: versioned puts, removes, and digests over the DHT
//! - `network_manager`: local identity and direct messaging
//! - `messages`: contact/response message formats
//! - `ordering`: deterministic peer ordering for master election
//!
//! The transports themselves live outside this crate; everything here is
//! interface plus plain data.

pub mod data_manager;
pub mod messages;
pub mod network_manager;
pub mod ordering;

pub use data_manager::{
    DataError, DataManager, DigestEntry, DigestResult, PutStatus, RawDigestResult, RawPutResult,
};
pub use messages::{ContactPeerMessage, ResponseMessage};
pub use network_manager::{NetworkError, NetworkManager, PublicKey};
pub use ordering::choose_first;
