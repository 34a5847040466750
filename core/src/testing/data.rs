//! Scriptable storage fake
//!
//! Put and digest results are queued up front and handed out in order, so a
//! test can walk a verifier through an exact sequence of transport
//! outcomes. Remove calls are recorded for inspection.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::data::{Id, NetworkContent, StorageKey};
use crate::network::{DataError, DataManager, RawDigestResult, RawPutResult};

/// In-memory DataManager with scripted responses
#[derive(Default)]
pub struct ScriptedDataManager {
    puts: Mutex<VecDeque<Result<RawPutResult, DataError>>>,
    digests: Mutex<VecDeque<Result<RawDigestResult, DataError>>>,
    removes: Mutex<Vec<(String, String, Id)>>,
    put_attempts: AtomicU32,
    fail_removes: AtomicBool,
}

impl ScriptedDataManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next put
    pub fn script_put(&self, result: Result<RawPutResult, DataError>) {
        self.puts.lock().unwrap().push_back(result);
    }

    /// Queue the result of the next digest query
    pub fn script_digest(&self, result: Result<RawDigestResult, DataError>) {
        self.digests.lock().unwrap().push_back(result);
    }

    /// Make every remove_version call fail from now on
    pub fn fail_removes(&self) {
        self.fail_removes.store(true, Ordering::SeqCst);
    }

    /// How many puts were issued
    pub fn put_attempts(&self) -> u32 {
        self.put_attempts.load(Ordering::SeqCst)
    }

    /// Every remove_version call seen so far, in order
    pub fn removed_versions(&self) -> Vec<(String, String, Id)> {
        self.removes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataManager for ScriptedDataManager {
    async fn put(
        &self,
        _location_key: &str,
        _content_key: &str,
        _content: &NetworkContent,
    ) -> Result<RawPutResult, DataError> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);
        self.puts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DataError::Transport("no scripted put result".into())))
    }

    async fn remove_version(
        &self,
        location_key: &str,
        content_key: &str,
        version_key: Id,
    ) -> Result<(), DataError> {
        self.removes.lock().unwrap().push((
            location_key.to_string(),
            content_key.to_string(),
            version_key,
        ));
        if self.fail_removes.load(Ordering::SeqCst) {
            Err(DataError::Transport("scripted remove failure".into()))
        } else {
            Ok(())
        }
    }

    async fn get_digest(
        &self,
        _location_key: &str,
        _from: StorageKey,
        _to: StorageKey,
    ) -> Result<RawDigestResult, DataError> {
        self.digests
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DataError::Transport("no scripted digest result".into())))
    }
}
