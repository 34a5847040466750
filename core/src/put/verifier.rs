//! Put verifier state machine
//!
//! One instance drives one write. The machine is an explicit state enum
//! advanced by a loop over transport future completions, so the
//! exactly-once notification is visible in the control flow instead of
//! buried in nested callbacks.
//!
//! Classification of a put result:
//! - failed future or empty raw result: transient, retry
//! - any version-conflict code on any replica: semantic, fail immediately
//! - a strict minority of replicas failing: proceed to digest verification
//! - anything else: retry
//!
//! Retries are bounded; each one first removes whatever replicas already
//! accepted, best effort, so a retried put does not double-commit.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::data::{version_range, NetworkContent, PeerId};
use crate::network::{DataManager, DigestResult, RawPutResult};
use crate::protocol::{ProtocolConfig, PutError};

use super::{CompletionReporter, PutListener};

/// Terminal result of one verified put
#[derive(Debug)]
pub enum PutOutcome {
    /// Quorum accepted and the digest confirms the write
    Success,
    /// The write failed; the reason is carried for logging
    Failure(PutError),
}

enum VerifyState {
    /// Issue the put to the replica set
    Issue,
    /// Interpret the per-replica reply codes
    Classify(RawPutResult),
    /// Remove accepted copies and re-issue, if the bound allows
    Retry,
    /// Probe the version digest for concurrent writers
    Verify,
    /// Terminal failure
    Fail(PutError),
    /// Terminal success
    Succeed,
}

/// Per-write verification state machine
///
/// Single use: `run` and `verify_put` consume the instance.
pub struct PutVerifier<D: DataManager> {
    data: Arc<D>,
    config: ProtocolConfig,
    location_key: String,
    content_key: String,
    content: NetworkContent,
    tries: u32,
}

impl<D: DataManager> PutVerifier<D> {
    pub fn new(
        data: Arc<D>,
        config: ProtocolConfig,
        location_key: impl Into<String>,
        content_key: impl Into<String>,
        content: NetworkContent,
    ) -> Self {
        Self {
            data,
            config,
            location_key: location_key.into(),
            content_key: content_key.into(),
            content,
            tries: 0,
        }
    }

    /// Drive the put to completion and notify the listener exactly once
    pub async fn verify_put(self, listener: &dyn PutListener) {
        let reporter = CompletionReporter::new(
            self.data.clone(),
            self.location_key.clone(),
            self.content_key.clone(),
            self.content.version_key,
        );

        match self.run().await {
            PutOutcome::Success => reporter.succeed(listener),
            PutOutcome::Failure(error) => reporter.fail(listener, error).await,
        }
    }

    /// Drive the put to completion and return the outcome
    ///
    /// No compensating cleanup happens on the terminal failure path here;
    /// that is the completion reporter's job.
    pub async fn run(mut self) -> PutOutcome {
        debug!(
            location_key = %self.location_key,
            content_key = %self.content_key,
            version_key = %self.content.version_key,
            "start verification of put"
        );

        let mut state = VerifyState::Issue;
        loop {
            state = match state {
                VerifyState::Issue => self.issue().await,
                VerifyState::Classify(result) => self.classify(result),
                VerifyState::Retry => self.retry().await,
                VerifyState::Verify => self.verify_digest().await,
                VerifyState::Fail(error) => return PutOutcome::Failure(error),
                VerifyState::Succeed => return PutOutcome::Success,
            };
        }
    }

    async fn issue(&self) -> VerifyState {
        match self
            .data
            .put(&self.location_key, &self.content_key, &self.content)
            .await
        {
            Ok(result) => VerifyState::Classify(result),
            Err(e) => {
                warn!(
                    location_key = %self.location_key,
                    content_key = %self.content_key,
                    version_key = %self.content.version_key,
                    error = %e,
                    "put future was not successful"
                );
                VerifyState::Retry
            }
        }
    }

    fn classify(&self, result: RawPutResult) -> VerifyState {
        if result.is_empty() {
            warn!("returned raw results are empty");
            return VerifyState::Retry;
        }

        let mut fail: HashSet<PeerId> = HashSet::new();
        let mut conflict: HashSet<PeerId> = HashSet::new();

        for (peer, statuses) in &result {
            let Some(statuses) = statuses else {
                warn!(
                    peer = %peer,
                    version_key = %self.content.version_key,
                    "a node gave no status back"
                );
                fail.insert(*peer);
                continue;
            };

            for status in statuses.values() {
                if status.is_conflict() {
                    warn!(
                        peer = %peer,
                        reason = %status,
                        version_key = %self.content.version_key,
                        "a version conflict was detected"
                    );
                    conflict.insert(*peer);
                } else if status.is_failure() {
                    warn!(
                        peer = %peer,
                        reason = %status,
                        version_key = %self.content.version_key,
                        "a node denied putting data"
                    );
                    fail.insert(*peer);
                }
            }
        }

        if !conflict.is_empty() {
            // Conflicts are semantic, not transient; retrying cannot help
            warn!(
                location_key = %self.location_key,
                content_key = %self.content_key,
                version_key = %self.content.version_key,
                "put verification failed, version conflict"
            );
            VerifyState::Fail(PutError::VersionConflict)
        } else if fail.len() * 2 < result.len() {
            // Strict majority of the contacted nodes responded with ok
            VerifyState::Verify
        } else {
            warn!(
                failed = fail.len(),
                contacted = result.len(),
                "too many contacted nodes failed"
            );
            VerifyState::Retry
        }
    }

    async fn retry(&mut self) -> VerifyState {
        if self.tries >= self.config.put_retries {
            error!(
                tries = self.tries,
                location_key = %self.location_key,
                content_key = %self.content_key,
                version_key = %self.content.version_key,
                "couldn't put data, all retries spent"
            );
            return VerifyState::Fail(PutError::RetriesExhausted(self.tries));
        }

        self.tries += 1;
        warn!(
            retry = self.tries,
            location_key = %self.location_key,
            content_key = %self.content_key,
            version_key = %self.content.version_key,
            "put retry"
        );

        // Remove possibly succeeded puts so the retry starts clean; the
        // outcome is logged but never gates the retry
        if let Err(e) = self
            .data
            .remove_version(&self.location_key, &self.content_key, self.content.version_key)
            .await
        {
            warn!(
                location_key = %self.location_key,
                content_key = %self.content_key,
                version_key = %self.content.version_key,
                error = %e,
                "could not delete the newly put content before retrying"
            );
        }

        VerifyState::Issue
    }

    async fn verify_digest(&self) -> VerifyState {
        let (from, to) = version_range(&self.location_key, &self.content_key);
        let raw_digest = match self.data.get_digest(&self.location_key, from, to).await {
            Ok(digest) if !digest.is_empty() => digest,
            Ok(_) | Err(_) => {
                error!(
                    location_key = %self.location_key,
                    content_key = %self.content_key,
                    version_key = %self.content.version_key,
                    "put verification failed, couldn't get digest"
                );
                return VerifyState::Fail(PutError::DigestUnavailable);
            }
        };

        for (peer, digest) in &raw_digest {
            let Some(digest) = digest.as_ref().filter(|d| !d.is_empty()) else {
                warn!(
                    peer = %peer,
                    location_key = %self.location_key,
                    content_key = %self.content_key,
                    version_key = %self.content.version_key,
                    "received no digest from peer"
                );
                continue;
            };

            if digest.first().map(|e| e.version_key) == Some(self.content.version_key) {
                debug!(peer = %peer, "entry is newest on peer");
            } else if digest.contains_version(self.content.version_key) {
                debug!(peer = %peer, "entry exists in history on peer");
            } else {
                warn!(
                    peer = %peer,
                    location_key = %self.location_key,
                    content_key = %self.content_key,
                    version_key = %self.content.version_key,
                    "concurrent modification happened"
                );
                if !self.my_version_wins(digest, peer) {
                    return VerifyState::Fail(PutError::ConcurrentModification);
                }
            }
        }

        VerifyState::Succeed
    }

    /// Decide the concurrent-writer race against one peer's digest
    ///
    /// Permissive by contract: a peer whose history does not even contain
    /// our parent, or records no successor of it, is broken and must not
    /// veto the write. On equal version keys the local write wins so two
    /// writers cannot livelock each other.
    fn my_version_wins(&self, digest: &DigestResult, peer: &PeerId) -> bool {
        if !digest.contains_version(self.content.based_on_key) {
            warn!(
                peer = %peer,
                based_on = %self.content.based_on_key,
                version_key = %self.content.version_key,
                "peer doesn't contain the based-on version"
            );
            return true;
        }

        let Some(successor) = digest.successor_of(self.content.based_on_key) else {
            if digest.first().map(|e| e.version_key) == Some(self.content.based_on_key) {
                error!(
                    peer = %peer,
                    version_key = %self.content.version_key,
                    "peer has no successor version"
                );
            } else {
                error!(
                    peer = %peer,
                    version_key = %self.content.version_key,
                    "peer has a corrupt version history"
                );
            }
            return true;
        };

        match successor.version_key.cmp(&self.content.version_key) {
            Ordering::Equal => {
                error!(
                    peer = %peer,
                    version_key = %self.content.version_key,
                    "peer has the same version"
                );
                true
            }
            Ordering::Less => {
                warn!(
                    peer = %peer,
                    theirs = %successor.version_key,
                    ours = %self.content.version_key,
                    "peer has an older competing version"
                );
                false
            }
            Ordering::Greater => {
                warn!(
                    peer = %peer,
                    theirs = %successor.version_key,
                    ours = %self.content.version_key,
                    "peer has a newer competing version"
                );
                true
            }
        }
    }
}
