use crate::{CoreResult, KeyValueStore, MemoError, RecordingStore};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Rename and delete against a [`RecordingStore`].
///
/// Both operations go through the store's mutation queue, re-read the
/// persisted list first, and write the whole list back. Concurrent editors
/// are last-writer-wins at list granularity.
pub struct ListEditor<S: KeyValueStore> {
    store: Arc<RecordingStore<S>>,
}

impl<S: KeyValueStore> Clone for ListEditor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> ListEditor<S> {
    /// Create an editor over a shared store.
    pub fn new(store: Arc<RecordingStore<S>>) -> Self {
        Self { store }
    }

    /// Give the recording `id` a new title.
    ///
    /// # Errors
    ///
    /// - [`MemoError::NotFound`] if `id` is not stored; nothing is written.
    /// - [`MemoError::PersistFailed`] if the write fails.
    #[instrument(skip(self, title))]
    pub async fn rename(&self, id: &str, title: &str) -> CoreResult<()> {
        let title = title.to_string();

        self.store
            .mutate(|recordings| {
                let recording = recordings.iter_mut().find(|r| r.id == id).ok_or_else(|| {
                    MemoError::NotFound {
                        id: id.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;
                recording.title = title;
                Ok(())
            })
            .await?;

        info!(recording_id = %id, "Recording renamed");

        Ok(())
    }

    /// Remove the recording `id`.
    ///
    /// The audio blob is not touched; releasing it is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`MemoError::NotFound`] if `id` is not stored; nothing is written.
    /// - [`MemoError::PersistFailed`] if the write fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        self.store
            .mutate(|recordings| {
                let index = recordings.iter().position(|r| r.id == id).ok_or_else(|| {
                    MemoError::NotFound {
                        id: id.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;
                recordings.remove(index);
                Ok(())
            })
            .await?;

        info!(recording_id = %id, "Recording deleted");

        Ok(())
    }
}
