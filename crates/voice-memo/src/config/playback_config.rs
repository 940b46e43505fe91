use crate::config::{default_player, default_player_args};

use serde::{Deserialize, Serialize};

/// External player used for playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Player executable, looked up on `PATH`.
    #[serde(default = "default_player")]
    pub player: String,

    /// Arguments placed before the file path.
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}
