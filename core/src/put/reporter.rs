//! Completion reporting
//!
//! Terminal notification for a verified put. The reporter is consumed on
//! use, so a verifier cannot notify twice. On failure the compensating
//! remove runs first; its outcome is logged and cannot turn the failure
//! into a success.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::data::Id;
use crate::network::DataManager;
use crate::protocol::PutError;

use super::PutListener;

/// Delivers the one terminal callback of a put verification
pub struct CompletionReporter<D: DataManager> {
    data: Arc<D>,
    location_key: String,
    content_key: String,
    version_key: Id,
}

impl<D: DataManager> CompletionReporter<D> {
    pub fn new(
        data: Arc<D>,
        location_key: impl Into<String>,
        content_key: impl Into<String>,
        version_key: Id,
    ) -> Self {
        Self {
            data,
            location_key: location_key.into(),
            content_key: content_key.into(),
            version_key,
        }
    }

    /// Notify success
    pub fn succeed(self, listener: &dyn PutListener) {
        debug!(
            location_key = %self.location_key,
            content_key = %self.content_key,
            version_key = %self.version_key,
            "verification for put completed"
        );
        listener.on_put_success();
    }

    /// Remove whatever replicas accepted, then notify failure
    pub async fn fail(self, listener: &dyn PutListener, error: PutError) {
        warn!(
            location_key = %self.location_key,
            content_key = %self.content_key,
            version_key = %self.version_key,
            error = %error,
            "put verification failed"
        );

        if let Err(e) = self
            .data
            .remove_version(&self.location_key, &self.content_key, self.version_key)
            .await
        {
            warn!(
                location_key = %self.location_key,
                content_key = %self.content_key,
                version_key = %self.version_key,
                error = %e,
                "could not delete the newly put content"
            );
        }

        listener.on_put_failure();
    }
}
