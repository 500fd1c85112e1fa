//! Fist-score estimation from a single set of hand landmarks.
//!
//! Each of the five digits is judged folded or extended from purely
//! geometric tests; the score is the folded fraction.

use crate::config::EstimatorConfig;
use crate::source::types::{
    LandmarkSet, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP, THUMB_IP, THUMB_TIP,
};

/// Fraction of folded digits, in [0, 1].
pub type FoldScore = f32;

/// Number of digits contributing to the score (four fingers plus the thumb).
pub const DIGIT_COUNT: usize = 5;

/// (tip, PIP joint) landmark pairs for the four non-thumb fingers.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Maps one landmark set to a fold score.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldEstimator {
    config: EstimatorConfig,
}

impl FoldEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Count folded digits.
    ///
    /// A finger is folded when its tip lies strictly more than the tolerance
    /// below its PIP joint (image y grows downwards). The thumb is folded
    /// when its tip is horizontally within the tolerance of its IP joint.
    pub fn folded_digits(&self, hand: &LandmarkSet) -> usize {
        let fingers = FINGER_JOINTS
            .iter()
            .filter(|&&(tip, pip)| hand[tip].y > hand[pip].y + self.config.finger_fold_tolerance)
            .count();

        let thumb_folded =
            (hand[THUMB_TIP].x - hand[THUMB_IP].x).abs() < self.config.thumb_fold_tolerance;

        fingers + usize::from(thumb_folded)
    }

    /// Compute the fold score for one hand.
    pub fn score(&self, hand: &LandmarkSet) -> FoldScore {
        self.folded_digits(hand) as FoldScore / DIGIT_COUNT as FoldScore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::types::{Landmark, LANDMARK_COUNT};

    const PIP_Y: f32 = 0.5;
    const THUMB_IP_X: f32 = 0.4;

    /// Build a hand with the chosen fingers folded and the thumb folded or not.
    fn hand(fingers: [bool; 4], thumb: bool) -> LandmarkSet {
        let mut points = [Landmark::new(0.5, 0.7); LANDMARK_COUNT];
        for (i, &(tip, pip)) in FINGER_JOINTS.iter().enumerate() {
            points[pip] = Landmark::new(0.5, PIP_Y);
            points[tip] = Landmark::new(0.5, if fingers[i] { 0.6 } else { 0.3 });
        }
        points[THUMB_IP] = Landmark::new(THUMB_IP_X, 0.55);
        points[THUMB_TIP] = Landmark::new(if thumb { 0.41 } else { 0.25 }, 0.5);
        LandmarkSet::new(points)
    }

    #[test]
    fn test_full_fist_scores_one() {
        let estimator = FoldEstimator::default();
        assert_eq!(estimator.folded_digits(&hand([true; 4], true)), 5);
        assert!((estimator.score(&hand([true; 4], true)) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_open_hand_scores_zero() {
        let estimator = FoldEstimator::default();
        assert_eq!(estimator.score(&hand([false; 4], false)), 0.0);
    }

    #[test]
    fn test_partial_fold() {
        let estimator = FoldEstimator::default();
        let score = estimator.score(&hand([true, true, false, false], true));
        assert!((score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_finger_boundary_is_not_folded() {
        let estimator = FoldEstimator::default();
        let tolerance = estimator.config().finger_fold_tolerance;

        let mut set = hand([false; 4], false);
        let mut points = *set.points();
        points[INDEX_TIP].y = points[INDEX_PIP].y + tolerance;
        set = LandmarkSet::new(points);
        assert_eq!(estimator.folded_digits(&set), 0);

        points[INDEX_TIP].y = points[INDEX_PIP].y + tolerance + 0.001;
        set = LandmarkSet::new(points);
        assert_eq!(estimator.folded_digits(&set), 1);
    }

    #[test]
    fn test_thumb_uses_absolute_distance() {
        let estimator = FoldEstimator::default();
        let mut points = *hand([false; 4], false).points();

        // Tip on either side of the IP joint counts as folded
        points[THUMB_TIP].x = THUMB_IP_X + 0.01;
        assert_eq!(estimator.folded_digits(&LandmarkSet::new(points)), 1);
        points[THUMB_TIP].x = THUMB_IP_X - 0.01;
        assert_eq!(estimator.folded_digits(&LandmarkSet::new(points)), 1);
        points[THUMB_TIP].x = THUMB_IP_X + 0.2;
        assert_eq!(estimator.folded_digits(&LandmarkSet::new(points)), 0);
    }

    #[test]
    fn test_tolerances_are_configurable() {
        let loose = FoldEstimator::new(EstimatorConfig {
            finger_fold_tolerance: 0.2,
            thumb_fold_tolerance: 0.5,
        });
        // Tips 0.1 below the PIP joint no longer count; the thumb now does
        assert_eq!(loose.folded_digits(&hand([true; 4], false)), 1);
    }

    #[test]
    fn test_score_bounds() {
        let estimator = FoldEstimator::default();
        for mask in 0..32u32 {
            let fingers = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0, mask & 8 != 0];
            let score = estimator.score(&hand(fingers, mask & 16 != 0));
            assert!((0.0..=1.0).contains(&score));
            assert!((score - mask.count_ones() as f32 / 5.0).abs() < 1e-6);
        }
    }
}
