use crate::{
    CoreResult, MemoError, Recording,
    capture::{AudioHandle, AudioStatus, CaptureBackend},
};

use std::{collections::HashMap, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// Result of [`PlaybackController::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// The recording is now audible.
    Playing,
    /// The recording is now paused.
    Paused,
}

/// Play/pause for recordings' audio handles, keyed by recording id.
///
/// Never reads or writes the recording store.
pub struct PlaybackController<B: CaptureBackend> {
    backend: Arc<B>,
    players: HashMap<String, Box<dyn AudioHandle>>,
}

impl<B: CaptureBackend> PlaybackController<B> {
    /// Create a controller that opens unknown recordings through `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            players: HashMap::new(),
        }
    }

    /// Hand over the audio handle produced when `id` was recorded.
    pub fn register(&mut self, id: impl Into<String>, audio: Box<dyn AudioHandle>) {
        self.players.insert(id.into(), audio);
    }

    /// Whether a handle is held for `id`.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    /// Drop the handle for `id`, pausing it first. Returns whether one was
    /// held.
    #[instrument(skip(self))]
    pub async fn release(&mut self, id: &str) -> bool {
        match self.players.remove(id) {
            Some(mut audio) => {
                if audio.status().await == AudioStatus::Playing
                    && let Err(e) = audio.pause().await
                {
                    warn!(recording_id = %id, error = %e, "Failed to pause released audio");
                }
                true
            }
            None => false,
        }
    }

    /// Pause if playing, otherwise play.
    ///
    /// A paused recording resumes; one that finished or never started plays
    /// from the beginning. Recordings without a registered handle are opened
    /// from their `file` URI.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::PlaybackFailed`] if the handle cannot be opened or
    /// refuses the command.
    #[instrument(skip(self, recording), fields(recording_id = %recording.id))]
    pub async fn toggle(&mut self, recording: &Recording) -> CoreResult<PlaybackState> {
        if !self.players.contains_key(&recording.id) {
            let audio = self.backend.open_audio(&recording.file).await.map_err(|e| {
                MemoError::PlaybackFailed {
                    reason: e.reason,
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;
            debug!(file = %recording.file, "Audio opened");
            self.players.insert(recording.id.clone(), audio);
        }

        let audio = self
            .players
            .get_mut(&recording.id)
            .ok_or_else(|| MemoError::PlaybackFailed {
                reason: "audio handle missing after open".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (result, next) = match audio.status().await {
            AudioStatus::Playing => (audio.pause().await, PlaybackState::Paused),
            AudioStatus::Paused => (audio.play().await, PlaybackState::Playing),
            AudioStatus::Idle | AudioStatus::Finished => {
                (audio.replay().await, PlaybackState::Playing)
            }
        };

        result.map_err(|e| MemoError::PlaybackFailed {
            reason: e.reason,
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(state = ?next, "Playback toggled");

        Ok(next)
    }

    /// Pause every playing handle.
    #[instrument(skip(self))]
    pub async fn pause_all(&mut self) {
        for (id, audio) in self.players.iter_mut() {
            if audio.status().await == AudioStatus::Playing
                && let Err(e) = audio.pause().await
            {
                warn!(recording_id = %id, error = %e, "Failed to pause audio");
            }
        }
    }
}
