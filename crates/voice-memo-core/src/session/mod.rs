mod duration;
mod id;
mod recording_session;

pub(crate) use id::next_recording_id;

pub use {
    duration::format_duration,
    recording_session::{Artifact, FinishedRecording, RecordingSession, SessionStatus},
};
