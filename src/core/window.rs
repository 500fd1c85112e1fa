//! Fixed-capacity rolling window of recent fold samples.
//!
//! Storage is allocated once at construction; pushes overwrite the oldest
//! slot so the per-frame path never allocates.

use crate::core::fold::FoldScore;

/// One classified detection callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Whether this single frame already looked like a fist
    pub is_fist_raw: bool,
    pub score: FoldScore,
}

impl Sample {
    /// Sentinel pushed when no hand was detected.
    pub const NO_HAND: Sample = Sample {
        is_fist_raw: false,
        score: 0.0,
    };

    pub fn new(is_fist_raw: bool, score: FoldScore) -> Self {
        Self { is_fist_raw, score }
    }
}

/// FIFO of the most recent samples, oldest evicted first.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    /// Circular storage, `capacity` slots
    data: Vec<Sample>,
    /// Next slot to write
    write_index: usize,
    /// Number of valid samples (saturates at capacity)
    len: usize,
}

impl SampleWindow {
    /// Create a window holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![Sample::default(); capacity],
            write_index: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Push a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: Sample) {
        self.data[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
    }

    /// Arithmetic mean of the scores present; 0 when empty.
    pub fn mean_score(&self) -> FoldScore {
        if self.len == 0 {
            return 0.0;
        }
        let sum: FoldScore = self.iter().map(|s| s.score).sum();
        sum / self.len as FoldScore
    }

    /// Number of samples that were individually classified as a fist.
    pub fn raw_fist_count(&self) -> usize {
        self.iter().filter(|s| s.is_fist_raw).count()
    }

    /// Samples in chronological order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        let start = (self.write_index + self.capacity() - self.len) % self.capacity();
        (0..self.len).map(move |i| &self.data[(start + i) % self.capacity()])
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(window: &SampleWindow) -> Vec<FoldScore> {
        window.iter().map(|s| s.score).collect()
    }

    #[test]
    fn test_partial_window_mean() {
        let mut window = SampleWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.mean_score(), 0.0);

        window.push(Sample::new(true, 1.0));
        assert_eq!(window.len(), 1);
        assert!((window.mean_score() - 1.0).abs() < 1e-6);

        window.push(Sample::NO_HAND);
        assert!((window.mean_score() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = SampleWindow::new(3);
        for score in [0.2, 0.4, 0.6, 0.8, 1.0] {
            window.push(Sample::new(false, score));
            assert!(window.len() <= window.capacity());
        }
        assert!(window.is_full());
        assert_eq!(window.len(), 3);
        assert_eq!(scores(&window), vec![0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut window = SampleWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.push(Sample::new(true, 0.4));
        window.push(Sample::new(false, 0.8));
        assert_eq!(scores(&window), vec![0.8]);
    }

    #[test]
    fn test_raw_fist_count_and_clear() {
        let mut window = SampleWindow::new(4);
        window.push(Sample::new(true, 1.0));
        window.push(Sample::NO_HAND);
        window.push(Sample::new(true, 0.8));
        assert_eq!(window.raw_fist_count(), 2);

        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.raw_fist_count(), 0);
    }
}
