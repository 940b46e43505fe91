//! Playback through an external player process.
//!
//! The player has no seek or pause protocol, so pausing stops the process and
//! resuming starts the file again from the beginning.

use std::{path::PathBuf, process::Stdio};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, instrument, warn};
use voice_memo_core::{AudioHandle, AudioStatus, BackendError};

/// Program and leading arguments used to play a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments placed before the file path.
    pub args: Vec<String>,
}

/// [`AudioHandle`] that runs one player process per play.
#[derive(Debug)]
pub struct ExternalPlayer {
    path: PathBuf,
    command: PlayerCommand,
    child: Option<Child>,
    paused: bool,
    started: bool,
}

impl ExternalPlayer {
    pub fn new(path: PathBuf, command: PlayerCommand) -> Self {
        Self {
            path,
            command,
            child: None,
            paused: false,
            started: false,
        }
    }

    async fn stop_child(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.kill().await
        {
            warn!(error = %e, "Failed to stop player process");
        }
    }
}

#[async_trait]
impl AudioHandle for ExternalPlayer {
    async fn play(&mut self) -> Result<(), BackendError> {
        self.replay().await
    }

    #[instrument(skip(self))]
    async fn replay(&mut self) -> Result<(), BackendError> {
        self.stop_child().await;

        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BackendError::new(format!(
                    "Failed to start player '{}': {}",
                    self.command.program, e
                ))
            })?;

        debug!(pid = ?child.id(), path = ?self.path, "Player started");

        self.child = Some(child);
        self.paused = false;
        self.started = true;

        Ok(())
    }

    async fn pause(&mut self) -> Result<(), BackendError> {
        self.stop_child().await;
        self.paused = true;
        Ok(())
    }

    async fn status(&mut self) -> AudioStatus {
        if let Some(child) = self.child.as_mut() {
            match child.try_wait() {
                Ok(None) => return AudioStatus::Playing,
                Ok(Some(exit)) => {
                    debug!(status = %exit, "Player exited");
                    self.child = None;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to poll player process");
                    self.child = None;
                }
            }
        }

        if self.paused {
            AudioStatus::Paused
        } else if self.started {
            AudioStatus::Finished
        } else {
            AudioStatus::Idle
        }
    }
}
