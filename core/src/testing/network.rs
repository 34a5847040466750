//! Scriptable transport fake
//!
//! Simulates the direct-messaging transport without a network. Each peer
//! gets a behavior: echo the nonce, echo garbage, stay silent, or fail at
//! send level. Sent messages are recorded for inspection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::data::PeerId;
use crate::network::{
    ContactPeerMessage, NetworkError, NetworkManager, PublicKey, ResponseMessage,
};

/// How a simulated peer reacts to a contact message
#[derive(Clone, Copy, Debug)]
pub enum PeerBehavior {
    /// Echo the nonce back
    Echo,
    /// Reply with content that does not match the evidence
    WrongEcho,
    /// Echo the nonce back after a delay
    DelayedEcho(Duration),
    /// Never reply
    Silent,
    /// Fail at send level
    SendFailure,
}

/// In-memory NetworkManager with per-peer scripted behavior
pub struct ScriptedNetwork {
    local: PeerId,
    behaviors: Mutex<HashMap<PeerId, PeerBehavior>>,
    sent: Mutex<Vec<ContactPeerMessage>>,
    // Held reply senders keep channels open for peers that never answer,
    // so the caller's wait ends at its deadline rather than on channel close
    held: Mutex<Vec<mpsc::Sender<ResponseMessage>>>,
}

impl ScriptedNetwork {
    pub fn new(local: PeerId) -> Self {
        Self {
            local,
            behaviors: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
        }
    }

    /// Script how a peer reacts; unscripted peers stay silent
    pub fn script_peer(&self, peer: PeerId, behavior: PeerBehavior) {
        self.behaviors.lock().unwrap().insert(peer, behavior);
    }

    /// Every contact message handed to the transport, in order
    pub fn sent_messages(&self) -> Vec<ContactPeerMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkManager for ScriptedNetwork {
    fn peer_id(&self) -> PeerId {
        self.local
    }

    fn node_id(&self) -> String {
        format!("test-node-{}", self.local)
    }

    fn public_key(&self) -> PublicKey {
        PublicKey(*self.local.as_bytes())
    }

    async fn send_direct(
        &self,
        message: ContactPeerMessage,
        _sign_with: &PublicKey,
        replies: mpsc::Sender<ResponseMessage>,
    ) -> Result<(), NetworkError> {
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&message.receiver)
            .copied()
            .unwrap_or(PeerBehavior::Silent);

        self.sent.lock().unwrap().push(message.clone());

        match behavior {
            PeerBehavior::SendFailure => {
                Err(NetworkError::SendFailed("scripted send failure".into()))
            }
            PeerBehavior::Silent => {
                self.held.lock().unwrap().push(replies);
                Ok(())
            }
            PeerBehavior::Echo => {
                let reply = ResponseMessage::new(message.receiver, message.nonce);
                tokio::spawn(async move {
                    replies.send(reply).await.ok();
                });
                Ok(())
            }
            PeerBehavior::WrongEcho => {
                let reply = ResponseMessage::new(message.receiver, "not-the-evidence");
                tokio::spawn(async move {
                    replies.send(reply).await.ok();
                });
                Ok(())
            }
            PeerBehavior::DelayedEcho(delay) => {
                let reply = ResponseMessage::new(message.receiver, message.nonce);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    replies.send(reply).await.ok();
                });
                Ok(())
            }
        }
    }
}
