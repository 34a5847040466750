//! Post-login liveness pass
//!
//! After login the stored locations list may name client endpoints that are
//! long gone. The reconciler probes every known endpoint with a fresh
//! evidence nonce, waits a bounded time for the echoes, and rebuilds the
//! list from the peers that answered, plus itself. One of them is elected
//! master of the shared user-message queue by picking the lowest peer
//! address; no coordination round is needed because every survivor computes
//! the same winner.
//!
//! The reconciler never fails. Whatever has answered by the deadline is the
//! new truth.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::data::{LocationEntry, Locations, PeerId};
use crate::network::{choose_first, ContactPeerMessage, NetworkManager, ResponseMessage};
use crate::protocol::ProtocolConfig;

/// Result of one reconciliation pass
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// The pruned locations list: responsive peers plus self
    pub locations: Locations,
    /// Whether the local node was elected master of the user-message queue
    pub is_master: bool,
}

/// Per-login liveness pass over a user's known client endpoints
///
/// Single use: `reconcile` consumes the instance.
pub struct LocationsReconciler<N: NetworkManager + 'static> {
    network: Arc<N>,
    config: ProtocolConfig,
}

impl<N: NetworkManager + 'static> LocationsReconciler<N> {
    pub fn new(network: Arc<N>, config: ProtocolConfig) -> Self {
        Self { network, config }
    }

    /// Probe the stored endpoints and rebuild the locations list
    ///
    /// Completes exactly once, after every probe is answered or failed, or
    /// at the configured deadline, whichever comes first.
    pub async fn reconcile(self, mut input: Locations) -> ReconcileOutcome {
        let myself = self.network.peer_id();
        input.remove_entry(myself);
        let peers: Vec<PeerId> = input.entries().map(|e| e.peer()).collect();

        if peers.is_empty() {
            debug!("no other client endpoints to contact");
            return self.finalize(input.user_id().to_string(), HashMap::new());
        }

        // evidence and responses stay owned by this task; transport threads
        // only ever talk to us through the reply channel
        let mut evidence: HashMap<PeerId, String> = HashMap::with_capacity(peers.len());
        let mut responses: HashMap<PeerId, bool> = HashMap::with_capacity(peers.len());

        let (reply_tx, mut reply_rx) = mpsc::channel::<ResponseMessage>(peers.len());
        let mut sends: JoinSet<Option<PeerId>> = JoinSet::new();
        let key = self.network.public_key();

        for peer in peers.iter().copied() {
            let nonce = Uuid::new_v4().to_string();
            evidence.insert(peer, nonce.clone());

            let message = ContactPeerMessage::new(peer, nonce);
            let network = self.network.clone();
            let tx = reply_tx.clone();
            sends.spawn(async move {
                match network.send_direct(message, &key, tx).await {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(peer = %peer, error = %e, "contact message could not be sent");
                        Some(peer)
                    }
                }
            });
        }
        drop(reply_tx);

        debug!(peers = peers.len(), "contacting other client endpoints");

        let deadline = time::sleep(self.config.contact_peers_await);
        tokio::pin!(deadline);
        let mut replies_open = true;

        while responses.len() < peers.len() {
            tokio::select! {
                _ = &mut deadline => {
                    debug!(
                        answered = responses.len(),
                        probed = peers.len(),
                        "liveness wait deadline reached"
                    );
                    break;
                }

                // A failed send means no reply will ever come; labeling the
                // peer now keeps the deadline from waiting on it
                Some(res) = sends.join_next(), if !sends.is_empty() => {
                    if let Ok(Some(failed)) = res {
                        responses.insert(failed, false);
                    }
                }

                reply = reply_rx.recv(), if replies_open => match reply {
                    Some(reply) => self.handle_reply(reply, &evidence, &mut responses),
                    None => replies_open = false,
                }
            }
        }

        // Anything still queued arrived too late to count
        while let Ok(reply) = reply_rx.try_recv() {
            warn!(
                peer = %reply.sender,
                "received a delayed contact response, ignoring"
            );
            self.notify_removed(reply.sender);
        }

        self.finalize(input.user_id().to_string(), responses)
    }

    fn handle_reply(
        &self,
        reply: ResponseMessage,
        evidence: &HashMap<PeerId, String>,
        responses: &mut HashMap<PeerId, bool>,
    ) {
        match evidence.get(&reply.sender) {
            // The echo check is byte-exact
            Some(expected) if expected.as_bytes() == reply.content.as_bytes() => {
                debug!(peer = %reply.sender, "liveness probe answered");
                responses.insert(reply.sender, true);
            }
            Some(_) => {
                error!(
                    peer = %reply.sender,
                    "wrong evidence content in a liveness reply"
                );
            }
            None => {
                warn!(
                    peer = %reply.sender,
                    "liveness reply from a peer that was never probed"
                );
            }
        }
    }

    fn finalize(&self, user_id: String, responses: HashMap<PeerId, bool>) -> ReconcileOutcome {
        let myself = self.network.peer_id();
        let mut locations = Locations::new(user_id);
        let mut election_pool = Vec::with_capacity(responses.len() + 1);

        for (peer, alive) in &responses {
            if *alive {
                locations.add_entry(LocationEntry::new(*peer));
                election_pool.push(*peer);
            } else {
                warn!(peer = %peer, "a dead client node was detected");
            }
        }

        election_pool.push(myself);
        let is_master = choose_first(election_pool) == myself;
        if is_master {
            warn!(
                node_id = %self.network.node_id(),
                "node selected as master for the user message queue"
            );
        }

        locations.add_entry(LocationEntry::new(myself));

        ReconcileOutcome {
            locations,
            is_master,
        }
    }

    /// Hook for telling a late responder it was dropped from the locations
    /// list. The message format for that is not settled, so for now the
    /// drop happens silently.
    // TODO: send the late responder a removal notice so it can re-announce
    fn notify_removed(&self, peer: PeerId) {
        debug!(peer = %peer, "late responder dropped without notification");
    }
}
