//! Voice Memo Core Library
//!
//! Recording-session lifecycle and persisted-list synchronization for a
//! voice memo app. Platform audio and key-value persistence are supplied by
//! the host through [`CaptureBackend`] and [`KeyValueStore`].
//!
//! # Example
//!
//! ```no_run
//! use voice_memo_core::{
//!     CapabilityGate, CaptureBackend, CaptureConfig, CoreResult, ListEditor,
//!     MemoryKeyValueStore, RecordingSession, RecordingStore,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn record_one<B: CaptureBackend>(backend: Arc<B>) -> CoreResult<()> {
//!     let gate = CapabilityGate::new(backend);
//!     let mut session = RecordingSession::new(gate.clone(), CaptureConfig::high_quality());
//!     let store = Arc::new(RecordingStore::new(MemoryKeyValueStore::new()));
//!     let _ = store.load().await;
//!
//!     let grant = gate.request().await?;
//!     session.start(grant).await?;
//!     let finished = session.finalize("Groceries").await?;
//!     store.append(finished.recording.clone()).await?;
//!
//!     ListEditor::new(Arc::clone(&store))
//!         .rename(&finished.recording.id, "Shopping list")
//!         .await
//! }
//! ```

mod capture;
mod error;
mod playback;
mod session;
mod store;

pub use {
    capture::{
        AudioHandle, AudioStatus, BackendError, CapabilityGate, CaptureBackend, CaptureConfig,
        CaptureHandle, CapturedAudio, Permission, PermissionGrant,
    },
    error::MemoError,
    error::Result as CoreResult,
    playback::{PlaybackController, PlaybackState},
    session::{Artifact, FinishedRecording, RecordingSession, SessionStatus, format_duration},
    store::{
        KeyValueStore, ListEditor, MemoryKeyValueStore, RECORDINGS_KEY, Recording,
        RecordingStore, StorageError,
    },
};

#[cfg(test)]
mod tests;
