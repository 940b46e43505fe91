use async_trait::async_trait;
use thiserror::Error;

/// Outcome of asking the platform for microphone access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Capture may begin.
    Granted,
    /// The user or platform refused access.
    Denied,
}

/// Capture settings handed to the backend when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Preferred sample rate in Hz. Backends may fall back to the device rate.
    pub sample_rate: u32,
    /// Number of channels in the stored file.
    pub channels: u16,
    /// Bit depth of the stored file.
    pub bits_per_sample: u16,
}

impl CaptureConfig {
    /// High-quality preset: 44.1 kHz stereo, 16-bit.
    pub fn high_quality() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            bits_per_sample: 16,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::high_quality()
    }
}

/// Playback position of an [`AudioHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStatus {
    /// Loaded but never started.
    Idle,
    /// Currently audible.
    Playing,
    /// Paused mid-way.
    Paused,
    /// Reached the end on its own.
    Finished,
}

/// Error reported by a platform backend.
///
/// The core maps these onto the [`MemoError`](crate::MemoError) variant that
/// matches the failing operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct BackendError {
    /// Human-readable reason for failure.
    pub reason: String,
}

impl BackendError {
    /// Create a backend error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Finished output of a capture handle.
pub struct CapturedAudio {
    /// Playable handle over the captured audio.
    pub audio: Box<dyn AudioHandle>,
    /// URI of the on-device audio blob.
    pub file: String,
    /// Elapsed capture time in milliseconds.
    pub duration_ms: u64,
}

impl std::fmt::Debug for CapturedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedAudio")
            .field("file", &self.file)
            .field("duration_ms", &self.duration_ms)
            .finish_non_exhaustive()
    }
}

/// Platform microphone and audio capability.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Ask for microphone access. May show an OS dialog on every call.
    async fn request_permission(&self) -> Permission;

    /// Begin capturing with the given settings.
    async fn start_capture(
        &self,
        config: &CaptureConfig,
    ) -> Result<Box<dyn CaptureHandle>, BackendError>;

    /// Open a playable handle for a previously captured file URI.
    async fn open_audio(&self, file: &str) -> Result<Box<dyn AudioHandle>, BackendError>;
}

/// An in-progress capture.
#[async_trait]
pub trait CaptureHandle: Send {
    /// Finish the capture and hand back the recorded audio.
    ///
    /// Called at most once; the handle is dropped afterwards whatever the
    /// outcome.
    async fn stop(&mut self) -> Result<CapturedAudio, BackendError>;
}

/// Playable audio.
#[async_trait]
pub trait AudioHandle: Send {
    /// Resume from the current position.
    async fn play(&mut self) -> Result<(), BackendError>;

    /// Restart from the beginning.
    async fn replay(&mut self) -> Result<(), BackendError>;

    /// Pause at the current position.
    async fn pause(&mut self) -> Result<(), BackendError>;

    /// Current playback status.
    async fn status(&mut self) -> AudioStatus;
}
