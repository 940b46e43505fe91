use crate::{
    CapabilityGate, CaptureConfig, MemoError, RecordingSession, tests::support::FakeBackend,
};

use std::sync::{Arc, atomic::Ordering};

/// WHAT: A denied permission request surfaces PermissionDenied
/// WHY: Capture must never begin without microphone access
#[tokio::test]
async fn given_denied_permission_when_requesting_then_permission_denied() {
    // Given: A backend that refuses microphone access
    let backend = FakeBackend::new();
    backend.deny_permission.store(true, Ordering::SeqCst);
    let gate = CapabilityGate::new(Arc::clone(&backend));

    // When: Requesting the capability
    let result = gate.request().await;

    // Then: PermissionDenied with the user-facing prompt, no capture started
    let err = result.err();
    assert!(matches!(err, Some(MemoError::PermissionDenied { .. })));
    assert_eq!(
        err.map(|e| e.user_message()),
        Some("Please grant permission to app to access microphone")
    );
    assert_eq!(backend.captures_started.load(Ordering::SeqCst), 0);
    assert!(!gate.is_capturing());
}

/// WHAT: Every request asks the backend again
/// WHY: Callers must tolerate repeated OS prompts, so grants are not cached
#[tokio::test]
async fn given_granted_once_when_requesting_again_then_backend_asked_again() {
    // Given: A gate whose first request was granted
    let backend = FakeBackend::new();
    let gate = CapabilityGate::new(Arc::clone(&backend));
    assert!(gate.request().await.is_ok());

    // When: The user revokes access and the app asks again
    backend.deny_permission.store(true, Ordering::SeqCst);
    let result = gate.request().await;

    // Then: The second answer is honoured
    assert!(matches!(result, Err(MemoError::PermissionDenied { .. })));
    assert_eq!(backend.permission_requests.load(Ordering::SeqCst), 2);
}

/// WHAT: Sessions sharing a gate cannot capture at the same time
/// WHY: At most one capture handle may exist per app instance
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_capturing_session_when_second_session_starts_then_already_capturing() {
    // Given: Two sessions built from clones of one gate, the first capturing
    let backend = FakeBackend::new();
    let gate = CapabilityGate::new(Arc::clone(&backend));
    let mut first = RecordingSession::new(gate.clone(), CaptureConfig::high_quality());
    let mut second = RecordingSession::new(gate.clone(), CaptureConfig::high_quality());
    first.start(gate.request().await.unwrap()).await.unwrap();

    // When: The second session tries to start
    let result = second.start(gate.request().await.unwrap()).await;

    // Then: It is rejected without touching the backend
    assert!(matches!(result, Err(MemoError::AlreadyCapturing { .. })));
    assert!(!second.is_capturing());
    assert_eq!(backend.captures_started.load(Ordering::SeqCst), 1);

    // And: Once the first stops, the second may start
    first.stop().await.unwrap();
    assert!(!gate.is_capturing());
    second.start(gate.request().await.unwrap()).await.unwrap();
    assert!(gate.is_capturing());
}
