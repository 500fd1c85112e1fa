//! Temporal smoothing of per-frame fold scores into a debounced clench level.
//!
//! Raw landmark estimates are noisy; averaging the last few frames keeps a
//! single missed or spurious detection from toggling the game input, at the
//! cost of at most one window of latency.

use crate::config::SmoothingConfig;
use crate::core::fold::FoldScore;
use crate::core::window::{Sample, SampleWindow};

/// Smoothed output after one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClenchReading {
    pub is_clenched: bool,
    /// Mean fold score of the window
    pub confidence: FoldScore,
}

/// Turns a stream of samples into a debounced clench level.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    window: SampleWindow,
    clench_threshold: FoldScore,
    release_threshold: Option<FoldScore>,
    reading: ClenchReading,
}

impl TemporalSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            window: SampleWindow::new(config.window_capacity),
            clench_threshold: config.clench_threshold,
            release_threshold: config.release_threshold,
            reading: ClenchReading::default(),
        }
    }

    /// Per-frame classification of a single score, before smoothing.
    pub fn is_fist(&self, score: FoldScore) -> bool {
        score >= self.clench_threshold
    }

    /// Build the sample for a scored hand.
    pub fn sample(&self, score: FoldScore) -> Sample {
        Sample::new(self.is_fist(score), score)
    }

    /// Push one sample and return the updated reading.
    ///
    /// With no release threshold the level is `mean >= clench_threshold`.
    /// With one, an engaged clench holds until the mean drops to or below it.
    pub fn push(&mut self, sample: Sample) -> ClenchReading {
        self.window.push(sample);
        let confidence = self.window.mean_score();

        let is_clenched = match self.release_threshold {
            Some(release) if self.reading.is_clenched => confidence > release,
            _ => confidence >= self.clench_threshold,
        };

        self.reading = ClenchReading {
            is_clenched,
            confidence,
        };
        self.reading
    }

    /// The most recent reading; the default reading before any sample.
    pub fn reading(&self) -> ClenchReading {
        self.reading
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.window.clear();
        self.reading = ClenchReading::default();
    }
}
