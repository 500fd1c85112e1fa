//! Hand landmark types delivered by a landmark source.
//!
//! Coordinates are normalized image-space values in [0, 1] with y growing downwards.

use serde::{Deserialize, Serialize};

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single tracked 2D keypoint.
///
/// Extra fields such as a `z` depth are ignored when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Exactly 21 landmarks of one detected hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSet([Landmark; LANDMARK_COUNT]);

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(points)
    }

    /// Build a set from an arbitrary slice, rejecting malformed input.
    pub fn from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                found: points.len(),
            });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(LandmarkError::NonFinite { index });
        }

        let mut set = [Landmark::default(); LANDMARK_COUNT];
        set.copy_from_slice(points);
        Ok(Self(set))
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.0[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Reasons a landmark sample is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    WrongCount { expected: usize, found: usize },
    NonFinite { index: usize },
}

impl std::fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandmarkError::WrongCount { expected, found } => {
                write!(f, "expected {expected} landmarks, got {found}")
            }
            LandmarkError::NonFinite { index } => {
                write!(f, "landmark {index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for LandmarkError {}

/// One detection callback from the landmark source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandFrame {
    /// No hand in view
    NoHand,
    /// A single hand was detected
    Hand(LandmarkSet),
    /// The source produced malformed landmarks; handled like `NoHand`
    Rejected,
}

impl HandFrame {
    /// Convert optional raw points into a frame, rejecting malformed sets.
    pub fn from_points(points: Option<&[Landmark]>) -> Self {
        match points {
            None => HandFrame::NoHand,
            Some(points) => match LandmarkSet::from_points(points) {
                Ok(set) => HandFrame::Hand(set),
                Err(e) => {
                    tracing::warn!("Rejecting landmark sample: {}", e);
                    HandFrame::Rejected
                }
            },
        }
    }

    /// The detected hand, if any.
    pub fn hand(&self) -> Option<&LandmarkSet> {
        match self {
            HandFrame::Hand(set) => Some(set),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_accepts_21() {
        let points = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        let set = LandmarkSet::from_points(&points).unwrap();
        assert_eq!(set[WRIST], Landmark::new(0.5, 0.5));
        assert_eq!(set.points().len(), LANDMARK_COUNT);
    }

    #[test]
    fn test_from_points_rejects_wrong_count() {
        let points = vec![Landmark::new(0.5, 0.5); 20];
        assert_eq!(
            LandmarkSet::from_points(&points),
            Err(LandmarkError::WrongCount {
                expected: 21,
                found: 20
            })
        );
    }

    #[test]
    fn test_from_points_rejects_nan() {
        let mut points = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        points[INDEX_TIP].y = f32::NAN;
        assert_eq!(
            LandmarkSet::from_points(&points),
            Err(LandmarkError::NonFinite { index: INDEX_TIP })
        );
    }

    #[test]
    fn test_frame_from_points() {
        assert_eq!(HandFrame::from_points(None), HandFrame::NoHand);

        let short = vec![Landmark::default(); 3];
        assert_eq!(HandFrame::from_points(Some(&short)), HandFrame::Rejected);

        let full = vec![Landmark::default(); LANDMARK_COUNT];
        assert!(HandFrame::from_points(Some(&full)).hand().is_some());
    }
}
