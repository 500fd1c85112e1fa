//! Session statistics for gesture input.
//!
//! Counts what the pipeline saw without keeping any landmark data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Counters for the current session.
#[derive(Debug)]
pub struct GestureStats {
    /// Frames with a valid hand
    hand_frames: AtomicU64,
    /// Frames where no hand was detected
    no_hand_frames: AtomicU64,
    /// Frames with malformed landmarks
    rejected_frames: AtomicU64,
    /// Transitions from open to clenched
    clench_engagements: AtomicU64,
    session_id: Uuid,
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl GestureStats {
    pub fn new() -> Self {
        Self {
            hand_frames: AtomicU64::new(0),
            no_hand_frames: AtomicU64::new(0),
            rejected_frames: AtomicU64::new(0),
            clench_engagements: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create stats that accumulate into the file at `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        if let Err(e) = stats.load() {
            tracing::warn!("Could not load previous gesture stats: {}", e);
        }

        stats
    }

    pub fn record_hand_frame(&self) {
        self.hand_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_no_hand_frame(&self) {
        self.no_hand_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_frame(&self) {
        self.rejected_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_clench(&self) {
        self.clench_engagements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Get the current statistics.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            hand_frames: self.hand_frames.load(Ordering::Relaxed),
            no_hand_frames: self.no_hand_frames.load(Ordering::Relaxed),
            rejected_frames: self.rejected_frames.load(Ordering::Relaxed),
            clench_engagements: self.clench_engagements.load(Ordering::Relaxed),
            session_id: self.session_id,
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        let total = stats.total_frames();
        let detection_rate = if total > 0 {
            stats.hand_frames as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        format!(
            "Session Statistics ({}):\n\
             - Frames processed: {}\n\
             - Hand detected: {} ({:.1}%)\n\
             - No hand: {}\n\
             - Malformed frames: {}\n\
             - Clenches: {}\n\
             - Session duration: {} seconds",
            stats.session_id,
            total,
            stats.hand_frames,
            detection_rate,
            stats.no_hand_frames,
            stats.rejected_frames,
            stats.clench_engagements,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                hand_frames: stats.hand_frames,
                no_hand_frames: stats.no_hand_frames,
                rejected_frames: stats.rejected_frames,
                clench_engagements: stats.clench_engagements,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.hand_frames
                    .store(persisted.hand_frames, Ordering::Relaxed);
                self.no_hand_frames
                    .store(persisted.no_hand_frames, Ordering::Relaxed);
                self.rejected_frames
                    .store(persisted.rejected_frames, Ordering::Relaxed);
                self.clench_engagements
                    .store(persisted.clench_engagements, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.hand_frames.store(0, Ordering::Relaxed);
        self.no_hand_frames.store(0, Ordering::Relaxed);
        self.rejected_frames.store(0, Ordering::Relaxed);
        self.clench_engagements.store(0, Ordering::Relaxed);
    }
}

impl Default for GestureStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub hand_frames: u64,
    pub no_hand_frames: u64,
    pub rejected_frames: u64,
    pub clench_engagements: u64,
    pub session_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

impl StatsSnapshot {
    pub fn total_frames(&self) -> u64 {
        self.hand_frames + self.no_hand_frames + self.rejected_frames
    }
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    hand_frames: u64,
    no_hand_frames: u64,
    rejected_frames: u64,
    clench_engagements: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared stats.
pub type SharedGestureStats = Arc<GestureStats>;

pub fn create_shared_stats() -> SharedGestureStats {
    Arc::new(GestureStats::new())
}

pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedGestureStats {
    Arc::new(GestureStats::with_persistence(path))
}
