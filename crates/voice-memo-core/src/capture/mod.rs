mod backend;
mod gate;

pub(crate) use gate::CaptureSlot;

pub use {
    backend::{
        AudioHandle, AudioStatus, BackendError, CaptureBackend, CaptureConfig, CaptureHandle,
        CapturedAudio, Permission,
    },
    gate::{CapabilityGate, PermissionGrant},
};
