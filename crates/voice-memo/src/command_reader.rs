//! Console command reader.
//!
//! Reads stdin line by line and forwards parsed commands to the main
//! application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{
    io::{BufRead, Write},
    panic::Location,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Turns console lines into [`AppCommand`]s.
pub struct CommandReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl CommandReader {
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run until shutdown is signalled or stdin closes.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Stdin has no async read on all platforms, so one blocking task
        // forwards lines. It exits on EOF or when `line_rx` is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Command reader shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    match line {
                        Some(line) => {
                            if line.trim().is_empty() {
                                continue;
                            }
                            self.handle_line(&line).await?;
                        }
                        None => {
                            info!("Input closed");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                    }
                }
            }
        }

        drop(line_rx);

        // The forwarder may be parked in a stdin read; it is cleaned up on
        // process exit if it does not stop in time.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Input forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Input forwarder task panicked"),
            Err(_) => debug!("Input forwarder did not stop within timeout, will be cleaned up on exit"),
        }

        Ok(())
    }

    async fn handle_line(&self, line: &str) -> AppResult<()> {
        match line.parse::<AppCommand>() {
            Ok(command) => self.send(command).await,
            Err(AppError::InvalidCommand { reason, .. }) => {
                println!("{}", reason);
                flush_stdout();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        debug!(command = ?command, "Forwarding command");
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Flush pending prompt output; failure only affects display.
pub(crate) fn flush_stdout() {
    let _ = std::io::stdout().flush();
}
