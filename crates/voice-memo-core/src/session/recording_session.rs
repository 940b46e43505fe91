use crate::{
    CoreResult, MemoError, Recording,
    capture::{
        AudioHandle, CapabilityGate, CaptureBackend, CaptureConfig, CaptureHandle, CaptureSlot,
        PermissionGrant,
    },
    session::{format_duration, next_recording_id},
};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Observable state of a [`RecordingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Not capturing.
    Idle,
    /// Capturing audio.
    Capturing {
        /// When capture started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

enum SessionState {
    Idle,
    Capturing(ActiveCapture),
}

struct ActiveCapture {
    handle: Box<dyn CaptureHandle>,
    started_at: Instant,
    session_id: Uuid,
    // Dropped together with the handle, releasing exclusivity.
    _slot: CaptureSlot,
}

/// Output of [`RecordingSession::stop`].
pub struct Artifact {
    /// Playable handle over the captured audio.
    pub audio: Box<dyn AudioHandle>,
    /// URI of the on-device audio blob.
    pub file: String,
    /// Elapsed capture time in milliseconds.
    pub duration_ms: u64,
    /// Session that produced this artifact.
    pub session_id: Uuid,
}

impl Artifact {
    /// Combine the artifact with a title and id into a recording plus its
    /// audio handle.
    pub fn into_recording(self, id: String, title: impl Into<String>) -> FinishedRecording {
        let recording = Recording {
            id,
            title: title.into(),
            file: self.file,
            duration: format_duration(self.duration_ms),
        };

        FinishedRecording {
            recording,
            audio: self.audio,
        }
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("file", &self.file)
            .field("duration_ms", &self.duration_ms)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

/// A recording ready to be appended to the store, with the audio handle the
/// playback controller can take over.
pub struct FinishedRecording {
    /// The value to persist.
    pub recording: Recording,
    /// Playable audio for `recording`.
    pub audio: Box<dyn AudioHandle>,
}

impl std::fmt::Debug for FinishedRecording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinishedRecording")
            .field("recording", &self.recording)
            .finish_non_exhaustive()
    }
}

/// Single-capture state machine: `Idle` → `Capturing` → `Idle`.
pub struct RecordingSession<B: CaptureBackend> {
    gate: CapabilityGate<B>,
    config: CaptureConfig,
    state: SessionState,
}

impl<B: CaptureBackend> RecordingSession<B> {
    /// Create an idle session that captures with `config`.
    pub fn new(gate: CapabilityGate<B>, config: CaptureConfig) -> Self {
        Self {
            gate,
            config,
            state: SessionState::Idle,
        }
    }

    /// Current state.
    pub fn status(&self) -> SessionStatus {
        match &self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Capturing(active) => SessionStatus::Capturing {
                started_at: active.started_at,
                session_id: active.session_id,
            },
        }
    }

    /// Whether this session is capturing.
    pub fn is_capturing(&self) -> bool {
        matches!(self.state, SessionState::Capturing(_))
    }

    /// Time since capture started, if capturing.
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Capturing(active) => Some(active.started_at.elapsed()),
        }
    }

    /// Start capturing.
    ///
    /// # Errors
    ///
    /// - [`MemoError::AlreadyCapturing`] if this session or another session on
    ///   the same gate is capturing.
    /// - [`MemoError::CaptureUnavailable`] if the backend cannot start; the
    ///   exclusivity slot is released again.
    #[instrument(skip(self, _grant))]
    pub async fn start(&mut self, _grant: PermissionGrant) -> CoreResult<Uuid> {
        if self.is_capturing() {
            return Err(MemoError::AlreadyCapturing {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let slot = self.gate.acquire()?;

        let handle = self
            .gate
            .backend()
            .start_capture(&self.config)
            .await
            .map_err(|e| MemoError::CaptureUnavailable {
                reason: e.reason,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let session_id = Uuid::new_v4();

        self.state = SessionState::Capturing(ActiveCapture {
            handle,
            started_at: Instant::now(),
            session_id,
            _slot: slot,
        });

        info!(session_id = %session_id, "Recording started");

        Ok(session_id)
    }

    /// Stop capturing and return the captured artifact.
    ///
    /// The session is `Idle` afterwards and exclusivity is released, even when
    /// the backend fails to finish the capture.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::StopFailed`] when no capture is active or the
    /// backend stop fails.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<Artifact> {
        let SessionState::Capturing(mut active) =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return Err(MemoError::StopFailed {
                reason: "no active recording session".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let session_id = active.session_id;

        let captured = match active.handle.stop().await {
            Ok(captured) => captured,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Capture handle failed to stop");
                return Err(MemoError::StopFailed {
                    reason: e.reason,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        info!(
            session_id = %session_id,
            duration_ms = captured.duration_ms,
            file = %captured.file,
            "Recording stopped"
        );

        Ok(Artifact {
            audio: captured.audio,
            file: captured.file,
            duration_ms: captured.duration_ms,
            session_id,
        })
    }

    /// Stop capturing and turn the result into a recording with a fresh id.
    ///
    /// Does not persist; pass the recording to
    /// [`RecordingStore::append`](crate::RecordingStore::append).
    ///
    /// # Errors
    ///
    /// Same as [`stop`](Self::stop).
    #[instrument(skip(self, title))]
    pub async fn finalize(&mut self, title: &str) -> CoreResult<FinishedRecording> {
        let artifact = self.stop().await?;
        let id = next_recording_id();

        info!(
            recording_id = %id,
            session_id = %artifact.session_id,
            "Recording finalized"
        );

        Ok(artifact.into_recording(id, title))
    }
}
