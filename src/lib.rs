//! Clench Gesture - debounced fist-clench detection from hand landmarks.
//!
//! A webcam hand tracker reports 21 landmarks per frame. This library turns
//! that noisy stream into a stable boolean "clench" level that a game loop
//! can poll every frame and edge-detect into a jump.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Clench Gesture                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │  Landmark   │──▶│ Fold score  │──▶│  Smoother   │         │
//! │  │   source    │   │ (per frame) │   │ (3 samples) │         │
//! │  └─────────────┘   └─────────────┘   └─────────────┘         │
//! │                                             │                │
//! │                                             ▼                │
//! │  ┌─────────────┐                     ┌─────────────┐         │
//! │  │   Session   │◀────────────────────│   Gesture   │◀── game │
//! │  │    stats    │                     │    state    │    loop │
//! │  └─────────────┘                     └─────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use clench_gesture::{Config, GestureService, JumpTrigger, NoopSource};
//!
//! # async fn run() {
//! let service = GestureService::new(NoopSource::new(), &Config::default());
//! service.initialize().await;
//!
//! let mut trigger = JumpTrigger::new();
//! // Once per rendered frame:
//! if trigger
//!     .poll(service.clench_state(), false, std::time::Instant::now())
//!     .is_some()
//! {
//!     // jump
//! }
//! # }
//! ```

pub mod config;
pub mod core;
pub mod input;
pub mod service;
pub mod source;
pub mod stats;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, EstimatorConfig, SmoothingConfig, SourceOptions};
pub use core::{
    ClenchReading, FoldEstimator, FoldScore, GestureHandle, GesturePipeline, GestureState,
    Sample, SampleWindow, TemporalSmoother,
};
pub use input::{JumpCause, JumpTrigger};
pub use service::GestureService;
pub use source::{
    HandFrame, Landmark, LandmarkSet, LandmarkSource, NoopSource, ReplaySource, SourceError,
};
pub use stats::{GestureStats, SharedGestureStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
