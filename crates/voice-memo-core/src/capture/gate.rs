use crate::{
    CoreResult, MemoError,
    capture::{CaptureBackend, Permission},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Proof that microphone permission was granted.
///
/// Only [`CapabilityGate::request`] can create one, so a session cannot start
/// without a granted request.
#[derive(Debug)]
pub struct PermissionGrant {
    _private: (),
}

/// Microphone permission and single-capture exclusivity.
///
/// Clones share the same backend and the same exclusivity flag: sessions
/// built from clones of one gate can never capture at the same time.
pub struct CapabilityGate<B: CaptureBackend> {
    backend: Arc<B>,
    capturing: Arc<AtomicBool>,
}

impl<B: CaptureBackend> Clone for CapabilityGate<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            capturing: Arc::clone(&self.capturing),
        }
    }
}

impl<B: CaptureBackend> CapabilityGate<B> {
    /// Create a gate over the platform backend.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            capturing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the backend for microphone access.
    ///
    /// Every call asks again; a previous grant is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::PermissionDenied`] when access is refused.
    #[instrument(skip(self))]
    pub async fn request(&self) -> CoreResult<PermissionGrant> {
        match self.backend.request_permission().await {
            Permission::Granted => {
                debug!("Microphone permission granted");
                Ok(PermissionGrant { _private: () })
            }
            Permission::Denied => {
                warn!("Microphone permission denied");
                Err(MemoError::PermissionDenied {
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    /// Whether any session on this gate currently holds the capture slot.
    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    pub(crate) fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    #[track_caller]
    pub(crate) fn acquire(&self) -> CoreResult<CaptureSlot> {
        self.capturing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MemoError::AlreadyCapturing {
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("Capture slot acquired");

        Ok(CaptureSlot {
            capturing: Arc::clone(&self.capturing),
        })
    }
}

/// RAII guard for the gate's exclusivity flag. Released on drop, including
/// on error paths.
#[derive(Debug)]
pub(crate) struct CaptureSlot {
    capturing: Arc<AtomicBool>,
}

impl Drop for CaptureSlot {
    fn drop(&mut self) {
        self.capturing.store(false, Ordering::Release);
        debug!("Capture slot released");
    }
}
