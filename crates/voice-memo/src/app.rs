use crate::{
    AppCommand,
    app_command::{HELP, resolve_item},
    audio::uri_path,
    command_reader::flush_stdout,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use voice_memo_core::{
    CapabilityGate, CaptureBackend, CoreResult, KeyValueStore, ListEditor, MemoError,
    PlaybackController, PlaybackState, Recording, RecordingSession, RecordingStore,
};

/// Main application state.
///
/// Owns the single recording session and playback controller; the store is
/// shared with the list editor.
pub struct App<B: CaptureBackend, S: KeyValueStore> {
    pub(crate) gate: CapabilityGate<B>,
    pub(crate) session: RecordingSession<B>,
    pub(crate) store: Arc<RecordingStore<S>>,
    pub(crate) editor: ListEditor<S>,
    pub(crate) playback: PlaybackController<B>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) pending_title: String,
}

impl<B: CaptureBackend, S: KeyValueStore> App<B, S> {
    /// Run the main application event loop until `Shutdown` or until the
    /// command channel closes.
    ///
    /// Command failures are reported to the user, never returned.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) {
        info!("Voice-Memo starting");

        println!("{}", self.load().await);
        println!("Type 'help' for commands.");
        flush_stdout();

        while let Some(command) = self.command_rx.recv().await {
            if command == AppCommand::Shutdown {
                info!("Shutdown requested");
                break;
            }
            println!("{}", self.handle(command).await);
            flush_stdout();
        }

        self.shutdown().await;

        let _ = self.shutdown_tx.send(true);
        info!("Voice-Memo shut down successfully");
    }

    /// Load the persisted list and describe the result.
    pub(crate) async fn load(&self) -> String {
        match self.store.load().await {
            Ok(recordings) => format!("{} saved recording(s).", recordings.len()),
            Err(e @ MemoError::CorruptStore { .. }) => {
                error!(error = ?e, "Recordings list is corrupt");
                format!("{} Type 'reset' to start a new list.", e.user_message())
            }
            Err(e) => {
                error!(error = ?e, "Failed to load recordings");
                e.user_message().to_string()
            }
        }
    }

    /// Execute one command and return the line to show the user.
    #[instrument(skip(self))]
    pub(crate) async fn handle(&mut self, command: AppCommand) -> String {
        let result = match command {
            AppCommand::StartRecording => self.start_recording().await,
            AppCommand::StopRecording { title } => self.stop_and_save(title).await,
            AppCommand::SetTitle { title } => {
                self.pending_title = title.trim().to_string();
                Ok(format!("Title set to '{}'.", self.pending_title))
            }
            AppCommand::List => Ok(self.list()),
            AppCommand::TogglePlayback { item } => self.toggle_playback(&item).await,
            AppCommand::Rename { item, title } => self.rename(&item, &title).await,
            AppCommand::Delete { item } => self.delete(&item).await,
            AppCommand::Reset => self
                .store
                .reset()
                .await
                .map(|()| "Recordings list cleared.".to_string()),
            AppCommand::Help => Ok(HELP.to_string()),
            // Intercepted by `run` before dispatch.
            AppCommand::Shutdown => Ok("Shutting down.".to_string()),
        };

        result.unwrap_or_else(|e| {
            error!(error = ?e, "Command failed");
            e.user_message().to_string()
        })
    }

    async fn start_recording(&mut self) -> CoreResult<String> {
        let grant = self.gate.request().await?;
        let session_id = self.session.start(grant).await?;

        info!(session_id = %session_id, "Recording started");

        Ok("Recording... type 'stop [title]' to save.".to_string())
    }

    async fn stop_and_save(&mut self, title: Option<String>) -> CoreResult<String> {
        let title = title.unwrap_or_else(|| self.pending_title.clone());
        let finished = self.session.finalize(&title).await?;
        let recording = finished.recording.clone();

        if let Err(e) = self.store.append(recording.clone()).await {
            // Nothing references the file once the append is refused.
            let path = uri_path(&recording.file);
            if let Err(io) = tokio::fs::remove_file(&path).await {
                warn!(path = ?path, error = %io, "Failed to remove unsaved recording");
            }
            return Err(e);
        }
        self.playback.register(recording.id.clone(), finished.audio);
        self.pending_title.clear();

        info!(recording_id = %recording.id, duration = %recording.duration, "Recording saved");

        Ok("Audio Saved.".to_string())
    }

    fn list(&self) -> String {
        let recordings = self.store.snapshot();
        if recordings.is_empty() {
            return "No recordings yet.".to_string();
        }

        recordings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let title = if r.title.is_empty() {
                    format!("Audio {}", i + 1)
                } else {
                    r.title.clone()
                };
                format!("{:>3}. {} - {}  [{}]", i + 1, title, r.duration, r.id)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn toggle_playback(&mut self, item: &str) -> CoreResult<String> {
        let recording = self.find(item)?;

        let message = match self.playback.toggle(&recording).await? {
            PlaybackState::Playing => format!("Playing '{}'.", recording.title),
            PlaybackState::Paused => format!("Paused '{}'.", recording.title),
        };

        Ok(message)
    }

    async fn rename(&mut self, item: &str, title: &str) -> CoreResult<String> {
        let recording = self.find(item)?;
        self.editor.rename(&recording.id, title).await?;
        Ok("Audio Title Updated.".to_string())
    }

    async fn delete(&mut self, item: &str) -> CoreResult<String> {
        let recording = self.find(item)?;

        self.playback.release(&recording.id).await;
        self.editor.delete(&recording.id).await?;

        let path = uri_path(&recording.file);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = ?path, error = %e, "Failed to remove audio file");
        }

        Ok("Audio Deleted...".to_string())
    }

    #[track_caller]
    fn find(&self, item: &str) -> CoreResult<Recording> {
        let recordings = self.store.snapshot();
        resolve_item(item, &recordings)
            .cloned()
            .ok_or_else(|| MemoError::NotFound {
                id: item.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Silence playback and discard an unsaved capture.
    async fn shutdown(&mut self) {
        self.playback.pause_all().await;

        if self.session.is_capturing() {
            match self.session.stop().await {
                Ok(artifact) => {
                    let path = uri_path(&artifact.file);
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        warn!(path = ?path, error = %e, "Failed to remove unsaved recording");
                    }
                    info!(session_id = %artifact.session_id, "Discarded unsaved recording");
                }
                Err(e) => warn!(error = ?e, "Failed to stop capture on shutdown"),
            }
        }
    }
}
