mod backend;
mod buffer;
mod capture;
mod player;
mod wav;

pub(crate) use {
    backend::{CpalBackend, uri_path},
    buffer::CaptureBuffer,
    capture::AudioCapturer,
    player::{ExternalPlayer, PlayerCommand},
    wav::{SampleLayout, encode_wav},
};
