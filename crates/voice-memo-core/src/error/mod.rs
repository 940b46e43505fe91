use error_location::ErrorLocation;
use thiserror::Error;

/// Recording lifecycle and storage errors with source location tracking.
#[derive(Error, Debug)]
pub enum MemoError {
    /// The user refused microphone access.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture device could not be started.
    #[error("Capture unavailable: {reason} {location}")]
    CaptureUnavailable {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session is already capturing on this gate.
    #[error("A recording is already in progress {location}")]
    AlreadyCapturing {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stop or finalize was requested without an active session, or the
    /// backend failed to finish the capture.
    #[error("Failed to stop recording: {reason} {location}")]
    StopFailed {
        /// Why the stop could not complete.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing the recordings entry to the key-value store failed.
    #[error("Failed to persist recordings: {reason} {location}")]
    PersistFailed {
        /// Description of the write failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading the recordings entry from the key-value store failed.
    #[error("Failed to read recordings: {reason} {location}")]
    StorageReadFailed {
        /// Description of the read failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The persisted recordings entry could not be decoded or validated.
    #[error("Stored recordings are corrupt: {reason} {location}")]
    CorruptStore {
        /// What was wrong with the stored data.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No recording with the given id exists.
    #[error("Recording not found: {id} {location}")]
    NotFound {
        /// The id that was looked up.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording with the same id is already stored.
    #[error("Recording id already exists: {id} {location}")]
    DuplicateId {
        /// The colliding id.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The audio handle refused to play or pause.
    #[error("Playback failed: {reason} {location}")]
    PlaybackFailed {
        /// Description of the playback failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl MemoError {
    /// Message suitable for showing to the user in place of the error.
    pub fn user_message(&self) -> &'static str {
        match self {
            MemoError::PermissionDenied { .. } => {
                "Please grant permission to app to access microphone"
            }
            MemoError::CaptureUnavailable { .. } => "Microphone is not available.",
            MemoError::AlreadyCapturing { .. } => "A recording is already in progress.",
            MemoError::StopFailed { .. } => "Failed to save. Record audio first!",
            MemoError::PersistFailed { .. } => "Failed to save audio!",
            MemoError::StorageReadFailed { .. } => "Failed to read saved audio.",
            MemoError::CorruptStore { .. } => "Saved audio list is unreadable.",
            MemoError::NotFound { .. } => "Audio not found.",
            MemoError::DuplicateId { .. } => "Audio already saved.",
            MemoError::PlaybackFailed { .. } => "Failed to play audio!",
        }
    }
}

/// Result type alias using [`MemoError`].
pub type Result<T> = std::result::Result<T, MemoError>;
