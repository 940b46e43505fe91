mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod playback_config;
mod storage_config;

pub(crate) use {
    audio_config::AudioConfig, config::Config, playback_config::PlaybackConfig,
    storage_config::StorageConfig,
};

use crate::{AppError, AppResult};

use std::panic::Location;

use directories::ProjectDirs;
use error_location::ErrorLocation;

pub(crate) const DEFAULT_MAX_DURATION_SECS: u32 = 300;

pub(crate) fn default_max_duration_secs() -> u32 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_player() -> String {
    if cfg!(target_os = "macos") {
        "afplay".to_string()
    } else {
        "ffplay".to_string()
    }
}

pub(crate) fn default_player_args() -> Vec<String> {
    if cfg!(target_os = "macos") {
        Vec::new()
    } else {
        ["-nodisp", "-autoexit", "-loglevel", "quiet"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

#[track_caller]
pub(crate) fn project_dirs() -> AppResult<ProjectDirs> {
    ProjectDirs::from("com", "voice-memo", "Voice-Memo").ok_or_else(|| AppError::ConfigError {
        reason: "Failed to get project directories".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
