//! Direct messages for the liveness probe
//!
//! A contact message carries a fresh random nonce; a live peer echoes the
//! nonce back verbatim in the response content. Anything else is treated as
//! a failed probe, never as a protocol error.

use serde::{Deserialize, Serialize};

use crate::data::PeerId;

/// Liveness probe sent to one of the user's other client endpoints
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ContactPeerMessage {
    /// The probed peer
    pub receiver: PeerId,
    /// Single-use random evidence, uuid-shaped UTF-8
    pub nonce: String,
}

impl ContactPeerMessage {
    pub fn new(receiver: PeerId, nonce: impl Into<String>) -> Self {
        Self {
            receiver,
            nonce: nonce.into(),
        }
    }
}

/// Reply to a contact message
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// The replying peer
    pub sender: PeerId,
    /// Echoed evidence content
    pub content: String,
}

impl ResponseMessage {
    pub fn new(sender: PeerId, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_message_roundtrip() {
        let msg = ContactPeerMessage::new(
            crate::testing::random_peer(),
            "4f9c2a50-6c2f-4b76-9b2e-1c0a8f6d3e21",
        );

        let bytes = postcard::to_allocvec(&msg).unwrap();
        let decoded: ContactPeerMessage = postcard::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_response_message_roundtrip() {
        let msg = ResponseMessage::new(PeerId::new([2; 32]), "echoed-evidence");

        let bytes = postcard::to_allocvec(&msg).unwrap();
        let decoded: ResponseMessage = postcard::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_response_preserves_content_bytes() {
        // The echo check is byte-exact; serialization must not normalize
        let content = "AbC-123\u{00e9}";
        let msg = ResponseMessage::new(PeerId::new([3; 32]), content);

        let bytes = postcard::to_allocvec(&msg).unwrap();
        let decoded: ResponseMessage = postcard::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.content.as_bytes(), content.as_bytes());
    }
}
