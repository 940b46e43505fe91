use crate::{
    CapabilityGate, CaptureConfig, MemoError, MemoryKeyValueStore, RecordingSession,
    RecordingStore, SessionStatus, tests::support::FakeBackend,
};

use std::sync::{Arc, atomic::Ordering};

fn session(
    backend: &Arc<FakeBackend>,
) -> (CapabilityGate<FakeBackend>, RecordingSession<FakeBackend>) {
    let gate = CapabilityGate::new(Arc::clone(backend));
    let session = RecordingSession::new(gate.clone(), CaptureConfig::high_quality());
    (gate, session)
}

/// WHAT: Stopping without an active session fails with StopFailed
/// WHY: The user pressing "save" before recording must get a message, not a crash
#[tokio::test]
async fn given_idle_session_when_stopping_then_stop_failed() {
    // Given: A session that never started
    let backend = FakeBackend::new();
    let (_gate, mut session) = session(&backend);

    // When: Stopping
    let result = session.stop().await;

    // Then: StopFailed asking the user to record first
    let err = result.err();
    assert!(matches!(err, Some(MemoError::StopFailed { .. })));
    assert_eq!(
        err.map(|e| e.user_message()),
        Some("Failed to save. Record audio first!")
    );
    assert_eq!(session.status(), SessionStatus::Idle);
}

/// WHAT: start → stop moves Idle → Capturing → Idle and yields the artifact
/// WHY: Core lifecycle of a single capture
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_granted_permission_when_starting_and_stopping_then_artifact_returned() {
    // Given: A granted session
    let backend = FakeBackend::new();
    let (gate, mut session) = session(&backend);
    let grant = gate.request().await.unwrap();

    // When: Starting
    let session_id = session.start(grant).await.unwrap();

    // Then: Capturing with the returned session id and exclusivity held
    assert!(matches!(
        session.status(),
        SessionStatus::Capturing { session_id: id, .. } if id == session_id
    ));
    assert!(session.elapsed().is_some());
    assert!(gate.is_capturing());

    // When: Stopping
    let artifact = session.stop().await.unwrap();

    // Then: Idle, exclusivity released, artifact carries file and duration
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.elapsed().is_none());
    assert!(!gate.is_capturing());
    assert_eq!(artifact.session_id, session_id);
    assert_eq!(artifact.duration_ms, 65_000);
    assert_eq!(artifact.file, "file:///recordings/capture-0.wav");
}

/// WHAT: Starting twice on the same session is rejected
/// WHY: start is only valid from Idle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_capturing_session_when_starting_again_then_already_capturing() {
    // Given: A capturing session
    let backend = FakeBackend::new();
    let (gate, mut session) = session(&backend);
    session.start(gate.request().await.unwrap()).await.unwrap();

    // When: Starting again
    let result = session.start(gate.request().await.unwrap()).await;

    // Then: Rejected, original capture untouched
    assert!(matches!(result, Err(MemoError::AlreadyCapturing { .. })));
    assert!(session.is_capturing());
    assert_eq!(backend.captures_started.load(Ordering::SeqCst), 1);
}

/// WHAT: Device failure on start leaves the session Idle and the slot free
/// WHY: A failed start must not leak exclusivity
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unavailable_device_when_starting_then_capture_unavailable_and_idle() {
    // Given: A backend whose device cannot start
    let backend = FakeBackend::new();
    backend.fail_start.store(true, Ordering::SeqCst);
    let (gate, mut session) = session(&backend);

    // When: Starting
    let result = session.start(gate.request().await.unwrap()).await;

    // Then: CaptureUnavailable, still Idle, gate free
    assert!(matches!(result, Err(MemoError::CaptureUnavailable { .. })));
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(!gate.is_capturing());
}

/// WHAT: A backend stop failure still releases the capture slot
/// WHY: The capture handle must be released on error paths too
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_stop_when_finalizing_then_slot_released_and_restartable() {
    // Given: A capture whose handle fails to stop
    let backend = FakeBackend::new();
    backend.fail_stop.store(true, Ordering::SeqCst);
    let (gate, mut session) = session(&backend);
    session.start(gate.request().await.unwrap()).await.unwrap();

    // When: Finalizing
    let result = session.finalize("Lost").await;

    // Then: StopFailed, session Idle, gate free
    assert!(matches!(result, Err(MemoError::StopFailed { .. })));
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(!gate.is_capturing());

    // And: A new capture can begin
    backend.fail_stop.store(false, Ordering::SeqCst);
    session.start(gate.request().await.unwrap()).await.unwrap();
    assert!(session.finalize("Found").await.is_ok());
}

/// WHAT: finalize builds a Recording from the artifact, title and a fresh id
/// WHY: This is the only place recordings are created
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_capturing_session_when_finalizing_then_recording_built() {
    // Given: A capturing session
    let backend = FakeBackend::new();
    let (gate, mut session) = session(&backend);
    session.start(gate.request().await.unwrap()).await.unwrap();

    // When: Finalizing with a padded title
    let finished = session.finalize("  Groceries ").await.unwrap();

    // Then: Title stored as given, formatted duration, file URI, numeric id
    let recording = &finished.recording;
    assert_eq!(recording.title, "  Groceries ");
    assert_eq!(recording.duration, "1:05");
    assert_eq!(recording.file, "file:///recordings/capture-0.wav");
    assert!(recording.id.parse::<u64>().is_ok());
    assert_eq!(session.status(), SessionStatus::Idle);
}

/// WHAT: Two sequential sessions produce distinct ids and both persist
/// WHY: Earlier sessions must not be dropped by later saves
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_two_sequential_sessions_when_appending_then_both_recordings_stored() {
    // Given: A session and a store
    let backend = FakeBackend::new();
    let (gate, mut session) = session(&backend);
    let store = RecordingStore::new(MemoryKeyValueStore::new());
    store.load().await.unwrap();

    // When: Recording and appending twice, keeping the first audio handle alive
    session.start(gate.request().await.unwrap()).await.unwrap();
    let first = session.finalize("First").await.unwrap();
    store.append(first.recording.clone()).await.unwrap();

    session.start(gate.request().await.unwrap()).await.unwrap();
    let second = session.finalize("Second").await.unwrap();
    store.append(second.recording.clone()).await.unwrap();

    // Then: Distinct ids, both present in order
    assert_ne!(first.recording.id, second.recording.id);
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, vec![first.recording.clone(), second.recording.clone()]);
    drop(first.audio);
}
