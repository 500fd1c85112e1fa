//! A landmark source that never sees a hand.
//!
//! Used where no camera backend is available, so the game still starts and
//! falls back to keyboard input.

use crate::config::SourceOptions;
use crate::source::types::HandFrame;
use crate::source::{LandmarkSource, SourceError, FRAME_CHANNEL_CAPACITY};
use crossbeam_channel::{bounded, Receiver, Sender};

/// A noop source that acquires successfully and never emits frames.
pub struct NoopSource {
    _sender: Sender<HandFrame>,
    receiver: Receiver<HandFrame>,
}

impl NoopSource {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(FRAME_CHANNEL_CAPACITY);
        Self {
            _sender: sender,
            receiver,
        }
    }
}

impl Default for NoopSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkSource for NoopSource {
    fn acquire(&self, _options: &SourceOptions) -> Result<Receiver<HandFrame>, SourceError> {
        Ok(self.receiver.clone())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
