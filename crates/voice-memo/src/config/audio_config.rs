use crate::config::default_max_duration_secs;

use serde::{Deserialize, Serialize};

/// Audio capture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Longest capture kept in memory; older samples are dropped beyond it.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u32,
}
