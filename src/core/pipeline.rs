//! The on-sample handler: one detection callback in, one published reading out.

use crate::config::{EstimatorConfig, SmoothingConfig};
use crate::core::fold::{FoldEstimator, FoldScore};
use crate::core::smoother::{ClenchReading, TemporalSmoother};
use crate::core::state::GestureState;
use crate::core::window::Sample;
use crate::source::types::HandFrame;
use crate::stats::SharedGestureStats;
use std::sync::Arc;

/// Result of handling one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Per-frame fold score; `None` when no valid hand was present
    pub score: Option<FoldScore>,
    pub reading: ClenchReading,
}

/// Estimator + smoother writing into the shared state.
pub struct GesturePipeline {
    estimator: FoldEstimator,
    smoother: TemporalSmoother,
    state: Arc<GestureState>,
    stats: Option<SharedGestureStats>,
}

impl GesturePipeline {
    pub fn new(
        estimator: &EstimatorConfig,
        smoothing: &SmoothingConfig,
        state: Arc<GestureState>,
    ) -> Self {
        Self {
            estimator: FoldEstimator::new(*estimator),
            smoother: TemporalSmoother::new(smoothing),
            state,
            stats: None,
        }
    }

    /// Count frames and clench engagements into `stats`.
    pub fn with_stats(mut self, stats: SharedGestureStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Handle one detection callback. Allocation-free.
    pub fn on_frame(&mut self, frame: &HandFrame) -> FrameOutcome {
        let (sample, score) = match frame {
            HandFrame::Hand(hand) => {
                let score = self.estimator.score(hand);
                (self.smoother.sample(score), Some(score))
            }
            HandFrame::NoHand | HandFrame::Rejected => (Sample::NO_HAND, None),
        };

        let was_clenched = self.smoother.reading().is_clenched;
        let reading = self.smoother.push(sample);
        self.state.publish(reading);

        if reading.is_clenched != was_clenched {
            tracing::debug!(
                clenched = reading.is_clenched,
                confidence = reading.confidence,
                "Clench state changed"
            );
        }

        if let Some(stats) = &self.stats {
            match frame {
                HandFrame::Hand(_) => stats.record_hand_frame(),
                HandFrame::NoHand => stats.record_no_hand_frame(),
                HandFrame::Rejected => stats.record_rejected_frame(),
            }
            if reading.is_clenched && !was_clenched {
                stats.record_clench();
            }
        }

        FrameOutcome { score, reading }
    }

    pub fn state(&self) -> &Arc<GestureState> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::types::{Landmark, LandmarkSet, LANDMARK_COUNT};
    use crate::stats::create_shared_stats;

    /// All five digits folded.
    fn fist() -> LandmarkSet {
        let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        for tip in [8, 12, 16, 20] {
            points[tip].y = 0.6;
        }
        LandmarkSet::new(points)
    }

    /// All five digits extended.
    fn open_hand() -> LandmarkSet {
        let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        for tip in [8, 12, 16, 20] {
            points[tip].y = 0.2;
        }
        points[4].x = 0.3;
        LandmarkSet::new(points)
    }

    fn pipeline() -> GesturePipeline {
        GesturePipeline::new(
            &EstimatorConfig::default(),
            &SmoothingConfig::default(),
            Arc::new(GestureState::new()),
        )
    }

    #[test]
    fn test_fist_frames_publish_clench() {
        let mut p = pipeline();
        let outcome = p.on_frame(&HandFrame::Hand(fist()));
        assert_eq!(outcome.score, Some(1.0));
        assert!(outcome.reading.is_clenched);
        assert!(p.state().clench_state());
        assert!((p.state().clench_confidence() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_no_hand_is_a_zero_sample() {
        let mut p = pipeline();
        p.on_frame(&HandFrame::Hand(fist()));
        for _ in 0..3 {
            let outcome = p.on_frame(&HandFrame::NoHand);
            assert_eq!(outcome.score, None);
        }
        assert!(!p.state().clench_state());
        assert_eq!(p.state().clench_confidence(), 0.0);
    }

    #[test]
    fn test_rejected_frames_count_as_no_hand() {
        let stats = create_shared_stats();
        let mut p = pipeline().with_stats(Arc::clone(&stats));

        p.on_frame(&HandFrame::Hand(fist()));
        p.on_frame(&HandFrame::Rejected);
        let outcome = p.on_frame(&HandFrame::Rejected);
        assert!((outcome.reading.confidence - 1.0 / 3.0).abs() < 1e-6);

        let snapshot = stats.stats();
        assert_eq!(snapshot.hand_frames, 1);
        assert_eq!(snapshot.rejected_frames, 2);
    }

    #[test]
    fn test_engagements_counted_once_per_clench() {
        let stats = create_shared_stats();
        let mut p = pipeline().with_stats(Arc::clone(&stats));

        for _ in 0..4 {
            p.on_frame(&HandFrame::Hand(fist()));
        }
        for _ in 0..3 {
            p.on_frame(&HandFrame::Hand(open_hand()));
        }
        for _ in 0..2 {
            p.on_frame(&HandFrame::Hand(fist()));
        }

        let snapshot = stats.stats();
        assert_eq!(snapshot.clench_engagements, 2);
        assert_eq!(snapshot.hand_frames, 9);
        assert_eq!(snapshot.no_hand_frames, 0);
    }
}
