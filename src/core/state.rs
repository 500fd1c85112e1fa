//! Shared gesture state: one writer (the pipeline), many lock-free readers.

use crate::core::fold::FoldScore;
use crate::core::smoother::ClenchReading;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of the landmark source bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Idle,
    Initializing,
    Ready,
    /// Timed out or cancelled; waiting for the abandoned acquisition to end
    Settling,
}

impl InitPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => InitPhase::Initializing,
            2 => InitPhase::Ready,
            3 => InitPhase::Settling,
            _ => InitPhase::Idle,
        }
    }
}

/// Latest smoothed gesture state.
#[derive(Debug)]
pub struct GestureState {
    clenched: AtomicBool,
    /// `f32` bit pattern of the smoothed confidence
    confidence: AtomicU32,
    phase: AtomicU8,
    ready_tx: watch::Sender<bool>,
}

impl GestureState {
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            clenched: AtomicBool::new(false),
            confidence: AtomicU32::new(0.0f32.to_bits()),
            phase: AtomicU8::new(InitPhase::Idle as u8),
            ready_tx,
        }
    }

    pub fn clench_state(&self) -> bool {
        self.clenched.load(Ordering::Acquire)
    }

    pub fn clench_confidence(&self) -> FoldScore {
        f32::from_bits(self.confidence.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == InitPhase::Ready
    }

    pub fn phase(&self) -> InitPhase {
        InitPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Current reading as a pair.
    pub fn reading(&self) -> ClenchReading {
        ClenchReading {
            is_clenched: self.clench_state(),
            confidence: self.clench_confidence(),
        }
    }

    /// Store a new reading. Only the pipeline calls this.
    pub fn publish(&self, reading: ClenchReading) {
        self.confidence
            .store(reading.confidence.to_bits(), Ordering::Release);
        self.clenched.store(reading.is_clenched, Ordering::Release);
    }

    /// Claim the right to initialize. False if already ready or in flight.
    pub fn begin_initialization(&self) -> bool {
        self.phase
            .compare_exchange(
                InitPhase::Idle as u8,
                InitPhase::Initializing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Give up an in-flight initialization so a later call may retry.
    pub fn abort_initialization(&self) {
        let _ = self.phase.compare_exchange(
            InitPhase::Initializing as u8,
            InitPhase::Idle as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Stop waiting on an in-flight initialization whose acquisition is
    /// still running. Retries are refused until `finish_settling`.
    pub fn settle_initialization(&self) -> bool {
        self.phase
            .compare_exchange(
                InitPhase::Initializing as u8,
                InitPhase::Settling as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// The abandoned acquisition has ended and anything it held is released.
    pub fn finish_settling(&self) {
        let _ = self.phase.compare_exchange(
            InitPhase::Settling as u8,
            InitPhase::Idle as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Mark the source as up. Permanent.
    pub fn mark_ready(&self) {
        self.phase.store(InitPhase::Ready as u8, Ordering::Release);
        self.ready_tx.send_replace(true);
    }

    /// Receiver that observes `true` once the source is up.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view handed to the game loop.
#[derive(Debug, Clone)]
pub struct GestureHandle {
    state: Arc<GestureState>,
}

impl GestureHandle {
    pub fn new(state: Arc<GestureState>) -> Self {
        Self { state }
    }

    /// Debounced clench level; false until a clenched hand has been seen.
    pub fn clench_state(&self) -> bool {
        self.state.clench_state()
    }

    /// Smoothed fold score; 0.0 until the first sample.
    pub fn clench_confidence(&self) -> FoldScore {
        self.state.clench_confidence()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = GestureState::new();
        assert!(!state.clench_state());
        assert_eq!(state.clench_confidence(), 0.0);
        assert!(!state.is_ready());
        assert_eq!(state.phase(), InitPhase::Idle);
    }

    #[test]
    fn test_publish_roundtrip() {
        let state = Arc::new(GestureState::new());
        let handle = GestureHandle::new(Arc::clone(&state));

        state.publish(ClenchReading {
            is_clenched: true,
            confidence: 0.8,
        });
        assert!(handle.clench_state());
        assert!((handle.clench_confidence() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_initialization_phases() {
        let state = GestureState::new();
        assert!(state.begin_initialization());
        assert!(!state.begin_initialization());
        assert_eq!(state.phase(), InitPhase::Initializing);

        state.abort_initialization();
        assert_eq!(state.phase(), InitPhase::Idle);

        assert!(state.begin_initialization());
        state.mark_ready();
        assert!(state.is_ready());
        assert!(!state.begin_initialization());

        // Ready never reverts
        state.abort_initialization();
        assert!(state.is_ready());
    }

    #[test]
    fn test_settling_refuses_retry() {
        let state = GestureState::new();
        assert!(!state.settle_initialization());

        assert!(state.begin_initialization());
        assert!(state.settle_initialization());
        assert_eq!(state.phase(), InitPhase::Settling);
        assert!(!state.is_ready());
        assert!(!state.begin_initialization());

        // Only settling returns to idle here
        state.abort_initialization();
        assert_eq!(state.phase(), InitPhase::Settling);

        state.finish_settling();
        assert_eq!(state.phase(), InitPhase::Idle);
        assert!(state.begin_initialization());

        // A stale finish does not disturb a newer attempt
        state.finish_settling();
        assert_eq!(state.phase(), InitPhase::Initializing);
    }

    #[test]
    fn test_ready_notification() {
        let state = GestureState::new();
        let rx = state.subscribe_ready();
        assert!(!*rx.borrow());
        state.mark_ready();
        assert!(*rx.borrow());
    }
}
