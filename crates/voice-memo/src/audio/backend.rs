//! Desktop [`CaptureBackend`] over cpal, hound and an external player.

use crate::audio::{AudioCapturer, ExternalPlayer, PlayerCommand, SampleLayout, encode_wav};

use std::{path::PathBuf, time::Instant};

use async_trait::async_trait;
use cpal::traits::HostTrait;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use voice_memo_core::{
    AudioHandle, BackendError, CaptureBackend, CaptureConfig, CaptureHandle, CapturedAudio,
    Permission,
};

const FILE_SCHEME: &str = "file://";

/// Microphone capture to WAV files in `recordings_dir`.
#[derive(Debug, Clone)]
pub struct CpalBackend {
    recordings_dir: PathBuf,
    max_duration_secs: u32,
    player: PlayerCommand,
}

impl CpalBackend {
    pub fn new(recordings_dir: PathBuf, max_duration_secs: u32, player: PlayerCommand) -> Self {
        Self {
            recordings_dir,
            max_duration_secs,
            player,
        }
    }
}

/// `file://` URI for a local path.
fn file_uri(path: &std::path::Path) -> String {
    format!("{}{}", FILE_SCHEME, path.display())
}

/// Local path named by a `file://` URI, or the input itself if it has no
/// scheme.
pub fn uri_path(file: &str) -> PathBuf {
    PathBuf::from(file.strip_prefix(FILE_SCHEME).unwrap_or(file))
}

fn join_error(e: tokio::task::JoinError) -> BackendError {
    BackendError::new(format!("Audio task failed: {}", e))
}

#[async_trait]
impl CaptureBackend for CpalBackend {
    /// Desktop hosts have no consent prompt; access counts as denied when no
    /// input device is reachable.
    #[instrument(skip(self))]
    async fn request_permission(&self) -> Permission {
        let available = tokio::task::spawn_blocking(|| {
            cpal::default_host().default_input_device().is_some()
        })
        .await
        .unwrap_or(false);

        if available {
            Permission::Granted
        } else {
            warn!("No input device available");
            Permission::Denied
        }
    }

    #[instrument(skip(self))]
    async fn start_capture(
        &self,
        config: &CaptureConfig,
    ) -> Result<Box<dyn CaptureHandle>, BackendError> {
        let max_duration_secs = self.max_duration_secs;

        let capturer = tokio::task::spawn_blocking(move || {
            let mut capturer = AudioCapturer::new(max_duration_secs)?;
            capturer.start()?;
            Ok::<_, crate::AppError>(capturer)
        })
        .await
        .map_err(join_error)?
        .map_err(|e| BackendError::new(e.to_string()))?;

        Ok(Box::new(CpalCaptureHandle {
            capturer: Some(capturer),
            started_at: Instant::now(),
            target: *config,
            recordings_dir: self.recordings_dir.clone(),
            player: self.player.clone(),
        }))
    }

    #[instrument(skip(self))]
    async fn open_audio(&self, file: &str) -> Result<Box<dyn AudioHandle>, BackendError> {
        let path = uri_path(file);

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BackendError::new(format!("Failed to check {}: {}", file, e)))?;
        if !exists {
            return Err(BackendError::new(format!("Audio file not found: {}", file)));
        }

        Ok(Box::new(ExternalPlayer::new(path, self.player.clone())))
    }
}

/// Running cpal capture that becomes a WAV file on stop.
struct CpalCaptureHandle {
    capturer: Option<AudioCapturer>,
    started_at: Instant,
    target: CaptureConfig,
    recordings_dir: PathBuf,
    player: PlayerCommand,
}

#[async_trait]
impl CaptureHandle for CpalCaptureHandle {
    #[instrument(skip(self))]
    async fn stop(&mut self) -> Result<CapturedAudio, BackendError> {
        let mut capturer = self
            .capturer
            .take()
            .ok_or_else(|| BackendError::new("Capture already stopped"))?;

        let elapsed_ms = u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        let target = self.target;
        let path = self.recordings_dir.join(format!("{}.wav", Uuid::new_v4()));
        let write_path = path.clone();

        let duration_ms = tokio::task::spawn_blocking(move || {
            let captured = capturer
                .stop()
                .map_err(|e| BackendError::new(e.to_string()))?;
            if captured.is_truncated() {
                warn!("Memo exceeded the maximum length; only its start was kept");
            }
            let samples = captured.into_samples();
            let layout = SampleLayout {
                sample_rate: capturer.sample_rate(),
                channels: capturer.channels(),
            };

            if let Some(parent) = write_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BackendError::new(format!("Failed to create recordings dir: {}", e))
                })?;
            }
            encode_wav(&write_path, &samples, layout, &target)?;

            Ok::<_, BackendError>(layout.duration_ms(samples.len()))
        })
        .await
        .map_err(join_error)??;

        info!(
            path = ?path,
            duration_ms,
            elapsed_ms,
            "Recording written"
        );

        Ok(CapturedAudio {
            audio: Box::new(ExternalPlayer::new(path.clone(), self.player.clone())),
            file: file_uri(&path),
            duration_ms,
        })
    }
}
