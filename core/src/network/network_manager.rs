//! Transport facade
//!
//! Exposes the local peer identity and fire-and-forget direct messaging.
//! The transport owns its own threads; replies are handed back through an
//! mpsc channel owned by the caller, so callers never share mutable state
//! with transport callbacks.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::data::PeerId;
use super::messages::{ContactPeerMessage, ResponseMessage};

/// Public half of the local key pair, used to sign liveness probes
///
/// Opaque to this crate; key generation and cryptography live elsewhere.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(pub [u8; 32]);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0[..8]))
    }
}

/// Errors surfaced by the messaging transport
#[derive(Debug)]
pub enum NetworkError {
    /// The message could not be handed to the wire
    SendFailed(String),
    /// No route to the receiver
    Unreachable,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::SendFailed(e) => write!(f, "send failed: {}", e),
            NetworkError::Unreachable => write!(f, "peer unreachable"),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Local identity and direct messaging
#[async_trait]
pub trait NetworkManager: Send + Sync {
    /// Address of the local peer
    fn peer_id(&self) -> PeerId;

    /// Human-readable node identifier, used only for logging
    fn node_id(&self) -> String;

    /// Public key the transport signs direct messages with
    fn public_key(&self) -> PublicKey;

    /// Send a contact message, fire and forget
    ///
    /// Returns `Err` only for send-level failures (the message never left).
    /// Replies addressed to this message arrive on `replies`; zero, one, or
    /// several may show up, at any later time.
    async fn send_direct(
        &self,
        message: ContactPeerMessage,
        sign_with: &PublicKey,
        replies: mpsc::Sender<ResponseMessage>,
    ) -> Result<(), NetworkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_display() {
        let err = NetworkError::SendFailed("socket closed".to_string());
        assert_eq!(err.to_string(), "send failed: socket closed");

        let err = NetworkError::Unreachable;
        assert_eq!(err.to_string(), "peer unreachable");
    }

    #[test]
    fn test_public_key_debug_is_short_hex() {
        let key = PublicKey([0xEF; 32]);
        assert_eq!(format!("{:?}", key), "PublicKey(efefefefefefefef)");
    }
}
