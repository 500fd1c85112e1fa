//! Replays recorded hand detections as a landmark source.
//!
//! Recordings are JSON Lines, one detection callback per line:
//!
//! ```text
//! {"hand": [{"x": 0.51, "y": 0.62}, ... 21 points ...]}
//! {"hand": null}
//! ```
//!
//! A missing or null `hand` means no hand was detected. Lines that fail to
//! parse, or carry the wrong number of points, replay as rejected frames.

use crate::config::SourceOptions;
use crate::source::types::{HandFrame, Landmark};
use crate::source::{LandmarkSource, SourceError, FRAME_CHANNEL_CAPACITY};
use crossbeam_channel::{bounded, Receiver};
use serde::Deserialize;
use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    hand: Option<Vec<Landmark>>,
}

/// A parsed recording.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub frames: Vec<HandFrame>,
    /// Number of lines that could not be turned into a valid frame
    pub rejected: usize,
}

/// Parse a JSON Lines recording. Blank lines are skipped.
pub fn parse_recording<R: BufRead>(reader: R) -> Result<Recording, SourceError> {
    let mut recording = Recording::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| SourceError::Io(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let frame = match serde_json::from_str::<RecordedFrame>(line) {
            Ok(recorded) => HandFrame::from_points(recorded.hand.as_deref()),
            Err(e) => {
                tracing::warn!("Skipping unreadable recording line {}: {}", line_no + 1, e);
                HandFrame::Rejected
            }
        };

        if frame == HandFrame::Rejected {
            recording.rejected += 1;
        }
        recording.frames.push(frame);
    }

    Ok(recording)
}

/// A source that plays back a fixed list of frames at the configured frame interval.
pub struct ReplaySource {
    frames: Arc<Vec<HandFrame>>,
    running: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReplaySource {
    pub fn new(frames: Vec<HandFrame>) -> Self {
        Self {
            frames: Arc::new(frames),
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        }
    }

    /// Load a recording from disk.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let file = std::fs::File::open(path).map_err(|e| SourceError::Io(e.to_string()))?;
        let recording = parse_recording(std::io::BufReader::new(file))?;
        if recording.rejected > 0 {
            tracing::warn!(
                "{} of {} recorded frames were malformed",
                recording.rejected,
                recording.frames.len()
            );
        }
        Ok(Self::new(recording.frames))
    }

    /// Number of frames in the recording.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check if playback is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl LandmarkSource for ReplaySource {
    fn acquire(&self, options: &SourceOptions) -> Result<Receiver<HandFrame>, SourceError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SourceError::AlreadyRunning);
        }

        let (sender, receiver) = bounded(FRAME_CHANNEL_CAPACITY);
        let frames = Arc::clone(&self.frames);
        let running = Arc::clone(&self.running);
        let interval = options.frame_interval;

        let handle = thread::spawn(move || {
            for frame in frames.iter() {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                // Receiver gone: nobody is listening any more
                if sender.send(*frame).is_err() {
                    break;
                }
                if !interval.is_zero() {
                    thread::sleep(interval);
                }
            }
            running.store(false, Ordering::SeqCst);
        });

        if let Ok(mut slot) = self.thread_handle.lock() {
            *slot = Some(handle);
        }

        Ok(receiver)
    }

    fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = self.thread_handle.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        self.release();
    }
}
