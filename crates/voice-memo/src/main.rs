//! Voice-Memo: record, title, replay and manage voice memos from the console.

mod app;
mod app_command;
mod audio;
mod command_reader;
mod config;
mod error;
mod file_store;
mod logging;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    command_reader::CommandReader,
    error::{AppError, Result as AppResult},
    file_store::FileKeyValueStore,
};

use crate::{
    audio::{CpalBackend, PlayerCommand},
    config::{Config, project_dirs},
};

use std::{sync::Arc, time::Duration};

use tokio::sync::{mpsc, watch};
use tracing::error;
use voice_memo_core::{
    CapabilityGate, CaptureConfig, ListEditor, PlaybackController, RecordingSession,
    RecordingStore,
};

/// Application entry point.
fn main() {
    // Held until exit so buffered log lines are flushed.
    let log_guard = match project_dirs()
        .and_then(|dirs| logging::init_logging(&dirs.data_local_dir().join("logs")))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let code = rt.block_on(run(config));

    // The stdin forwarder may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_millis(100));

    // process::exit skips destructors.
    drop(log_guard);
    std::process::exit(code);
}

async fn run(config: Config) -> i32 {
    let file_store = match FileKeyValueStore::new(config.storage.store_dir()) {
        Ok(store) => store,
        Err(e) => {
            error!(error = ?e, "Failed to open store directory");
            eprintln!("Failed to open store directory: {}", e);
            return 1;
        }
    };

    let backend = Arc::new(CpalBackend::new(
        config.storage.recordings_dir(),
        config.audio.max_duration_secs,
        PlayerCommand {
            program: config.playback.player.clone(),
            args: config.playback.args.clone(),
        },
    ));

    let gate = CapabilityGate::new(Arc::clone(&backend));
    let store = Arc::new(RecordingStore::new(file_store));
    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let app = App {
        session: RecordingSession::new(gate.clone(), CaptureConfig::high_quality()),
        gate,
        editor: ListEditor::new(Arc::clone(&store)),
        store,
        playback: PlaybackController::new(backend),
        command_rx,
        shutdown_tx,
        pending_title: String::new(),
    };

    let reader = CommandReader::new(command_tx);

    let (reader_result, ()) = tokio::join!(reader.run(shutdown_rx), app.run());

    match reader_result {
        Ok(()) => 0,
        Err(e) => {
            error!(error = ?e, "Command reader error");
            1
        }
    }
}
