//! Microphone capture over cpal.
//!
//! The input callback runs on cpal's audio thread and appends into a shared
//! [`CaptureBuffer`]. The buffer is capped at the configured maximum length
//! and keeps the start of the memo once full.

use crate::{AppError, AppResult, audio::CaptureBuffer};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Grace period for a callback already running when the stream is dropped.
const CALLBACK_DRAIN: Duration = Duration::from_millis(5);

/// One microphone capture on the default input device.
pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    buffer: Arc<Mutex<CaptureBuffer>>,
    /// Raised before the stream is dropped; the callback writes nothing after.
    stopped: Arc<AtomicBool>,
    max_samples: usize,
}

impl AudioCapturer {
    /// Open the default input device with room for `max_duration_secs` of
    /// audio at the device's rate and channel count.
    #[track_caller]
    #[instrument]
    pub fn new(max_duration_secs: u32) -> AppResult<Self> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| AppError::DeviceError {
                reason: "No microphone found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config: StreamConfig = device
            .default_input_config()
            .map_err(|e| AppError::DeviceError {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .into();

        let max_samples =
            max_duration_secs as usize * config.sample_rate as usize * config.channels as usize;

        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            max_samples,
            "Microphone opened"
        );

        Ok(Self {
            device,
            config,
            stream: None,
            buffer: Arc::new(Mutex::new(CaptureBuffer::new(max_samples))),
            stopped: Arc::new(AtomicBool::new(false)),
            max_samples,
        })
    }

    /// Start streaming into a fresh buffer.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> AppResult<()> {
        *self.lock_buffer()? = CaptureBuffer::new(self.max_samples);
        self.stopped.store(false, Ordering::Release);

        let buffer = Arc::clone(&self.buffer);
        let stopped = Arc::clone(&self.stopped);
        let max_samples = self.max_samples;

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if stopped.load(Ordering::Acquire) {
                        return;
                    }
                    // A poisoned lock still holds valid samples; keep recording.
                    let mut buffer = buffer.lock().unwrap_or_else(|e| e.into_inner());
                    if buffer.push(data) {
                        warn!(max_samples, "Maximum memo length reached, later audio dropped");
                    }
                },
                |err| {
                    error!(error = %err, "Input stream error");
                },
                None,
            )
            .map_err(|e| AppError::DeviceError {
                reason: format!("Failed to build input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AppError::DeviceError {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Microphone capture started");

        Ok(())
    }

    /// Stop streaming and hand over everything captured since `start`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> AppResult<CaptureBuffer> {
        self.stopped.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            std::thread::sleep(CALLBACK_DRAIN);
            info!("Microphone capture stopped");
        }

        let fresh = CaptureBuffer::new(self.max_samples);
        let captured = std::mem::replace(&mut *self.lock_buffer()?, fresh);

        debug!(truncated = captured.is_truncated(), "Capture buffer taken");

        Ok(captured)
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    #[track_caller]
    fn lock_buffer(&self) -> AppResult<MutexGuard<'_, CaptureBuffer>> {
        self.buffer.lock().map_err(|e| AppError::DeviceError {
            reason: format!("Failed to lock capture buffer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
