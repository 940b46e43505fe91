use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where recordings and the recordings list are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root data directory.
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Directory holding the key-value files.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Directory holding captured audio files.
    pub fn recordings_dir(&self) -> PathBuf {
        self.data_dir.join("recordings")
    }
}
