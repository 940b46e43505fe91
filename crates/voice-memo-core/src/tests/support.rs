//! In-memory fakes for the platform backend and the key-value medium.

use crate::{
    AudioHandle, AudioStatus, BackendError, CaptureBackend, CaptureConfig, CaptureHandle,
    CapturedAudio, KeyValueStore, MemoryKeyValueStore, Permission, Recording, StorageError,
};

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};

use async_trait::async_trait;

/// Scriptable [`CaptureBackend`].
pub(crate) struct FakeBackend {
    pub(crate) deny_permission: AtomicBool,
    pub(crate) fail_start: AtomicBool,
    pub(crate) fail_stop: AtomicBool,
    pub(crate) fail_open: AtomicBool,
    pub(crate) permission_requests: AtomicUsize,
    pub(crate) captures_started: AtomicUsize,
    pub(crate) duration_ms: AtomicU64,
    /// Status shared by every audio handle this backend hands out.
    pub(crate) audio_status: Arc<Mutex<AudioStatus>>,
    pub(crate) audio_calls: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            deny_permission: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
            permission_requests: AtomicUsize::new(0),
            captures_started: AtomicUsize::new(0),
            duration_ms: AtomicU64::new(65_000),
            audio_status: Arc::new(Mutex::new(AudioStatus::Idle)),
            audio_calls: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub(crate) fn set_audio_status(&self, status: AudioStatus) {
        *self.audio_status.lock().unwrap_or_else(|e| e.into_inner()) = status;
    }

    pub(crate) fn audio_calls(&self) -> Vec<&'static str> {
        self.audio_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn audio(&self) -> Box<dyn AudioHandle> {
        Box::new(FakeAudio {
            status: Arc::clone(&self.audio_status),
            calls: Arc::clone(&self.audio_calls),
        })
    }
}

#[async_trait]
impl CaptureBackend for FakeBackend {
    async fn request_permission(&self) -> Permission {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        if self.deny_permission.load(Ordering::SeqCst) {
            Permission::Denied
        } else {
            Permission::Granted
        }
    }

    async fn start_capture(
        &self,
        _config: &CaptureConfig,
    ) -> Result<Box<dyn CaptureHandle>, BackendError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(BackendError::new("no input device"));
        }

        let n = self.captures_started.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeCapture {
            file: format!("file:///recordings/capture-{n}.wav"),
            duration_ms: self.duration_ms.load(Ordering::SeqCst),
            fail: self.fail_stop.load(Ordering::SeqCst),
            audio: Some(self.audio()),
        }))
    }

    async fn open_audio(&self, _file: &str) -> Result<Box<dyn AudioHandle>, BackendError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(BackendError::new("file missing"));
        }
        Ok(self.audio())
    }
}

struct FakeCapture {
    file: String,
    duration_ms: u64,
    fail: bool,
    audio: Option<Box<dyn AudioHandle>>,
}

#[async_trait]
impl CaptureHandle for FakeCapture {
    async fn stop(&mut self) -> Result<CapturedAudio, BackendError> {
        if self.fail {
            return Err(BackendError::new("encoder crashed"));
        }

        let audio = self
            .audio
            .take()
            .ok_or_else(|| BackendError::new("already stopped"))?;

        Ok(CapturedAudio {
            audio,
            file: self.file.clone(),
            duration_ms: self.duration_ms,
        })
    }
}

struct FakeAudio {
    status: Arc<Mutex<AudioStatus>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeAudio {
    fn record(&self, call: &'static str, next: AudioStatus) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

#[async_trait]
impl AudioHandle for FakeAudio {
    async fn play(&mut self) -> Result<(), BackendError> {
        self.record("play", AudioStatus::Playing);
        Ok(())
    }

    async fn replay(&mut self) -> Result<(), BackendError> {
        self.record("replay", AudioStatus::Playing);
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), BackendError> {
        self.record("pause", AudioStatus::Paused);
        Ok(())
    }

    async fn status(&mut self) -> AudioStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// [`KeyValueStore`] whose reads and writes can be made to fail.
#[derive(Default)]
pub(crate) struct FlakyKeyValueStore {
    inner: MemoryKeyValueStore,
    pub(crate) fail_reads: AtomicBool,
    pub(crate) fail_writes: AtomicBool,
    pub(crate) writes: AtomicUsize,
}

impl FlakyKeyValueStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Raw persisted value, bypassing failure injection.
    pub(crate) async fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap_or(None)
    }

    /// Write a raw value, bypassing failure injection.
    pub(crate) async fn put_raw(&self, key: &str, value: &str) {
        let _ = self.inner.set(key, value.to_string()).await;
    }
}

#[async_trait]
impl KeyValueStore for FlakyKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "disk unplugged".to_string(),
            });
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }
}

/// Recording with predictable fields for store tests.
pub(crate) fn recording(id: &str, title: &str) -> Recording {
    Recording {
        id: id.to_string(),
        title: title.to_string(),
        file: format!("file:///recordings/{id}.wav"),
        duration: "0:05".to_string(),
    }
}
