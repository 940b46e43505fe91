//! Bounded sample buffer for one capture.

/// Interleaved samples capped at a fixed length.
///
/// Once full, later samples are refused so the start of a memo is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureBuffer {
    samples: Vec<f32>,
    max_samples: usize,
    truncated: bool,
}

impl CaptureBuffer {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Vec::new(),
            max_samples,
            truncated: false,
        }
    }

    /// Append as much of `data` as fits.
    ///
    /// Returns `true` only on the call that first overflows the cap.
    pub fn push(&mut self, data: &[f32]) -> bool {
        let room = self.max_samples.saturating_sub(self.samples.len());
        let accepted = room.min(data.len());
        self.samples.extend_from_slice(&data[..accepted]);

        if accepted < data.len() && !self.truncated {
            self.truncated = true;
            return true;
        }
        false
    }

    /// Whether samples were refused because the cap was reached.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
