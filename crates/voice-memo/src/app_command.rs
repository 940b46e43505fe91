use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;
use voice_memo_core::Recording;

/// Console help, one line per command.
pub(crate) const HELP: &str = "\
Commands:
  record                  start recording
  stop [title]            stop and save (alias: save)
  title <text>            set the title used by the next save
  list                    show saved recordings
  play <n|id>             play or pause a recording
  rename <n|id> <title>   change a recording's title
  delete <n|id>           remove a recording
  reset                   clear an unreadable recordings list
  help                    show this help
  quit                    exit";

/// Commands sent from the console reader to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording session.
    StartRecording,
    /// Stop the current session and save it.
    StopRecording {
        /// Title for the recording; falls back to the pending title.
        title: Option<String>,
    },
    /// Set the title used by the next save.
    SetTitle {
        /// The new pending title.
        title: String,
    },
    /// Print the recording list.
    List,
    /// Play or pause a recording.
    TogglePlayback {
        /// 1-based list position or recording id.
        item: String,
    },
    /// Rename a recording.
    Rename {
        /// 1-based list position or recording id.
        item: String,
        /// The new title.
        title: String,
    },
    /// Delete a recording.
    Delete {
        /// 1-based list position or recording id.
        item: String,
    },
    /// Overwrite an unreadable recordings list with an empty one.
    Reset,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl FromStr for AppCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "record" | "rec" => AppCommand::StartRecording,
            "stop" | "save" => AppCommand::StopRecording {
                title: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "title" => AppCommand::SetTitle {
                title: rest.to_string(),
            },
            "list" | "ls" => AppCommand::List,
            "play" | "pause" => AppCommand::TogglePlayback {
                item: required(rest, "play needs a recording number or id")?.to_string(),
            },
            "rename" | "edit" => {
                let (item, title) = rest
                    .split_once(char::is_whitespace)
                    .map(|(item, title)| (item, title.trim()))
                    .filter(|(_, title)| !title.is_empty())
                    .ok_or_else(|| AppError::InvalidCommand {
                        reason: "rename needs a recording number or id and a title".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                AppCommand::Rename {
                    item: item.to_string(),
                    title: title.to_string(),
                }
            }
            "delete" | "rm" => AppCommand::Delete {
                item: required(rest, "delete needs a recording number or id")?.to_string(),
            },
            "reset" => AppCommand::Reset,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" | "q" => AppCommand::Shutdown,
            other => {
                return Err(AppError::InvalidCommand {
                    reason: format!("unknown command '{}', type 'help'", other),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}

#[track_caller]
fn required<'a>(value: &'a str, reason: &str) -> Result<&'a str, AppError> {
    if value.is_empty() {
        return Err(AppError::InvalidCommand {
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(value)
}

/// Find a recording by 1-based display position or by id.
///
/// Positions win when the token is a number within the list length; ids are
/// epoch milliseconds, so they never collide with a position.
pub(crate) fn resolve_item<'a>(item: &str, recordings: &'a [Recording]) -> Option<&'a Recording> {
    if let Ok(position) = item.parse::<usize>()
        && (1..=recordings.len()).contains(&position)
    {
        return recordings.get(position - 1);
    }

    recordings.iter().find(|r| r.id == item)
}
