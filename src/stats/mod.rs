//! Session statistics for the gesture agent.

pub mod log;

pub use log::{
    create_shared_stats, create_shared_stats_with_persistence, GestureStats, SharedGestureStats,
    StatsSnapshot,
};
