//! Core signal processing for clench detection.
//!
//! This module contains:
//! - Fold-score estimation from one landmark set
//! - The rolling sample window and temporal smoother
//! - Shared gesture state and the per-frame pipeline writing into it

pub mod fold;
pub mod pipeline;
pub mod smoother;
pub mod state;
pub mod window;

// Re-export commonly used types
pub use fold::{FoldEstimator, FoldScore, DIGIT_COUNT};
pub use pipeline::{FrameOutcome, GesturePipeline};
pub use smoother::{ClenchReading, TemporalSmoother};
pub use state::{GestureHandle, GestureState, InitPhase};
pub use window::{Sample, SampleWindow};
