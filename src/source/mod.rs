//! Landmark sources feeding the gesture pipeline.
//!
//! A source stands in for the camera + hand-landmark model. Acquiring it
//! brings the capture up (which may block on a permission prompt) and hands
//! back a channel of per-frame detections.

pub mod noop;
pub mod replay;
pub mod types;

use crate::config::SourceOptions;
use crossbeam_channel::Receiver;
use std::time::Duration;

pub use noop::NoopSource;
pub use replay::{parse_recording, Recording, ReplaySource};
pub use types::{HandFrame, Landmark, LandmarkError, LandmarkSet, LANDMARK_COUNT};

/// Capacity of the channel between a source and the pipeline.
pub const FRAME_CHANNEL_CAPACITY: usize = 256;

/// Something that produces hand detections.
pub trait LandmarkSource: Send + Sync + 'static {
    /// Bring the source up and return the channel its frames arrive on.
    ///
    /// May block (camera permission, model download). Called from a blocking
    /// task, at most once per successful initialization.
    fn acquire(&self, options: &SourceOptions) -> Result<Receiver<HandFrame>, SourceError>;

    /// Stop delivering frames and release the underlying device.
    fn release(&self) {}

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Errors that can occur while acquiring a landmark source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The user or platform refused camera access
    PermissionDenied(String),
    /// No usable device or model
    Unavailable(String),
    AlreadyRunning,
    TimedOut(Duration),
    Cancelled,
    Io(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::PermissionDenied(e) => write!(f, "Camera access denied: {e}"),
            SourceError::Unavailable(e) => write!(f, "Landmark source unavailable: {e}"),
            SourceError::AlreadyRunning => write!(f, "Landmark source is already running"),
            SourceError::TimedOut(d) => {
                write!(f, "Landmark source did not come up within {}ms", d.as_millis())
            }
            SourceError::Cancelled => write!(f, "Initialization was cancelled"),
            SourceError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for SourceError {}
