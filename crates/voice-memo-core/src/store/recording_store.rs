//! Authoritative recording list mirrored between memory and a key-value store.
//!
//! Every mutation follows the same protocol under one async mutex:
//!
//! 1. re-read the persisted entry (never trust the in-memory copy),
//! 2. apply the change to that fresh list,
//! 3. write the whole list back in a single `set`,
//! 4. publish the new list as the in-memory snapshot.
//!
//! `tokio::sync::Mutex` grants the lock in FIFO order, so concurrent callers
//! queue up and each mutation starts from the result of the previous one.

use crate::{CoreResult, KeyValueStore, MemoError, Recording};

use std::{collections::HashSet, panic::Location};

use error_location::ErrorLocation;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

/// Key under which the serialized recording list is stored.
pub const RECORDINGS_KEY: &str = "recordings";

/// The recording list and its persistence protocol.
pub struct RecordingStore<S: KeyValueStore> {
    backend: S,
    mutation_lock: Mutex<()>,
    snapshot: watch::Sender<Vec<Recording>>,
}

impl<S: KeyValueStore> RecordingStore<S> {
    /// Create a store over `backend` with an empty snapshot. Call
    /// [`load`](Self::load) to populate it.
    pub fn new(backend: S) -> Self {
        let (snapshot, _) = watch::channel(Vec::new());

        Self {
            backend,
            mutation_lock: Mutex::new(()),
            snapshot,
        }
    }

    /// Copy of the in-memory snapshot, in creation order.
    pub fn snapshot(&self) -> Vec<Recording> {
        self.snapshot.borrow().clone()
    }

    /// Look up a recording in the snapshot.
    pub fn get(&self, id: &str) -> Option<Recording> {
        self.snapshot.borrow().iter().find(|r| r.id == id).cloned()
    }

    /// Receiver notified whenever the snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Recording>> {
        self.snapshot.subscribe()
    }

    /// Read the persisted list into the snapshot and return it.
    ///
    /// An absent entry yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`MemoError::CorruptStore`] if the entry cannot be decoded; the
    ///   snapshot is emptied so the caller can continue with no recordings.
    /// - [`MemoError::StorageReadFailed`] if the medium cannot be read; the
    ///   snapshot is left as it was.
    #[instrument(skip(self))]
    pub async fn load(&self) -> CoreResult<Vec<Recording>> {
        let _guard = self.mutation_lock.lock().await;

        match self.read_persisted().await {
            Ok(recordings) => {
                info!(count = recordings.len(), "Recordings loaded");
                self.snapshot.send_replace(recordings.clone());
                Ok(recordings)
            }
            Err(e @ MemoError::CorruptStore { .. }) => {
                warn!(error = %e, "Stored recordings unreadable, continuing with empty list");
                self.snapshot.send_replace(Vec::new());
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Append a recording and persist the full list.
    ///
    /// # Errors
    ///
    /// - [`MemoError::DuplicateId`] if the id is already stored; nothing is
    ///   written.
    /// - [`MemoError::PersistFailed`] if the write fails; the snapshot stays
    ///   at the pre-append list.
    /// - [`MemoError::CorruptStore`] / [`MemoError::StorageReadFailed`] if the
    ///   current persisted list cannot be read.
    #[instrument(skip(self, recording), fields(recording_id = %recording.id))]
    pub async fn append(&self, recording: Recording) -> CoreResult<()> {
        self.mutate(|recordings| {
            if recordings.iter().any(|r| r.id == recording.id) {
                return Err(MemoError::DuplicateId {
                    id: recording.id.clone(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            recordings.push(recording);
            Ok(())
        })
        .await?;

        info!("Recording appended");

        Ok(())
    }

    /// Overwrite the persisted entry with an empty list.
    ///
    /// Recovery path after [`MemoError::CorruptStore`]: mutations refuse to
    /// overwrite data they cannot read.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::PersistFailed`] if the write fails.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> CoreResult<()> {
        let _guard = self.mutation_lock.lock().await;

        self.write_persisted(&[]).await?;
        self.snapshot.send_replace(Vec::new());

        warn!("Recordings reset to empty list");

        Ok(())
    }

    /// Run `apply` against the freshly read persisted list and write the
    /// result back. Holds the mutation lock for the whole sequence.
    ///
    /// If `apply` fails nothing is written; if the write fails the snapshot
    /// keeps the list as it was read.
    pub(crate) async fn mutate<T, F>(&self, apply: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Vec<Recording>) -> CoreResult<T> + Send,
    {
        let _guard = self.mutation_lock.lock().await;

        let mut recordings = self.read_persisted().await?;

        // Another instance may have written since our last look.
        self.snapshot.send_if_modified(|current| {
            if *current == recordings {
                false
            } else {
                debug!(
                    previous = current.len(),
                    persisted = recordings.len(),
                    "Snapshot resynced with persisted list"
                );
                current.clone_from(&recordings);
                true
            }
        });

        let outcome = apply(&mut recordings)?;

        self.write_persisted(&recordings).await?;
        self.snapshot.send_replace(recordings);

        Ok(outcome)
    }

    async fn read_persisted(&self) -> CoreResult<Vec<Recording>> {
        let raw = self
            .backend
            .get(RECORDINGS_KEY)
            .await
            .map_err(|e| MemoError::StorageReadFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        match raw {
            Some(raw) => decode(&raw),
            None => {
                debug!("No persisted recordings entry");
                Ok(Vec::new())
            }
        }
    }

    async fn write_persisted(&self, recordings: &[Recording]) -> CoreResult<()> {
        let payload =
            serde_json::to_string(recordings).map_err(|e| MemoError::PersistFailed {
                reason: format!("Failed to serialize recordings: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.backend
            .set(RECORDINGS_KEY, payload)
            .await
            .map_err(|e| MemoError::PersistFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(count = recordings.len(), "Recordings persisted");

        Ok(())
    }
}

/// Decode and validate the persisted JSON array.
#[track_caller]
fn decode(raw: &str) -> CoreResult<Vec<Recording>> {
    let recordings: Vec<Recording> =
        serde_json::from_str(raw).map_err(|e| MemoError::CorruptStore {
            reason: format!("Failed to parse recordings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let mut seen = HashSet::with_capacity(recordings.len());
    for recording in &recordings {
        if recording.id.is_empty() {
            return Err(MemoError::CorruptStore {
                reason: "recording with empty id".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if !seen.insert(recording.id.as_str()) {
            return Err(MemoError::CorruptStore {
                reason: format!("duplicate recording id {}", recording.id),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    }

    Ok(recordings)
}
