mod key_value;
mod list_editor;
mod recording;
mod recording_store;

pub use {
    key_value::{KeyValueStore, MemoryKeyValueStore, StorageError},
    list_editor::ListEditor,
    recording::Recording,
    recording_store::{RECORDINGS_KEY, RecordingStore},
};
