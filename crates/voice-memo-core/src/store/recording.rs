use serde::{Deserialize, Serialize};

/// A finished, persisted recording.
///
/// The same shape is used in memory and in the stored JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Unique, immutable id (epoch milliseconds at creation).
    pub id: String,
    /// User-supplied label.
    pub title: String,
    /// URI of the on-device audio blob.
    pub file: String,
    /// Capture length rendered as `M:SS`.
    pub duration: String,
}
