//! Configuration for the clench gesture agent.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration for the gesture agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fold-score tolerances
    pub estimator: EstimatorConfig,

    /// Temporal smoothing of fold scores
    pub smoothing: SmoothingConfig,

    /// Options handed to the landmark source on acquisition
    pub source: SourceOptions,

    /// Upper bound on landmark source bring-up
    #[serde(with = "duration_serde")]
    pub init_timeout: Duration,

    /// Path for persisting session statistics
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clench-gesture");

        Self {
            estimator: EstimatorConfig::default(),
            smoothing: SmoothingConfig::default(),
            source: SourceOptions::default(),
            init_timeout: Duration::from_secs(10),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clench-gesture")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Path of the persisted session statistics.
    pub fn stats_path(&self) -> PathBuf {
        self.data_path.join("stats.json")
    }

    /// Reject settings the classifier cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let est = &self.estimator;
        if !(est.finger_fold_tolerance >= 0.0) || !(est.thumb_fold_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(
                "fold tolerances must be non-negative".to_string(),
            ));
        }

        let smoothing = &self.smoothing;
        if !(0.0..=1.0).contains(&smoothing.clench_threshold) {
            return Err(ConfigError::Invalid(format!(
                "clench_threshold {} is outside [0, 1]",
                smoothing.clench_threshold
            )));
        }
        if let Some(release) = smoothing.release_threshold {
            if !(0.0..=1.0).contains(&release) || release > smoothing.clench_threshold {
                return Err(ConfigError::Invalid(format!(
                    "release_threshold {release} must be in [0, clench_threshold]"
                )));
            }
        }

        if self.source.max_num_hands == 0 {
            return Err(ConfigError::Invalid(
                "max_num_hands must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Tolerances used when judging whether a digit is folded.
///
/// Values are in normalized image coordinates and absorb landmark detection noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// A finger is folded when its tip sits more than this below its PIP joint
    pub finger_fold_tolerance: f32,
    /// The thumb is folded when its tip is horizontally closer than this to its IP joint
    pub thumb_fold_tolerance: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            finger_fold_tolerance: 0.02,
            thumb_fold_tolerance: 0.03,
        }
    }
}

/// Temporal smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Number of recent samples averaged
    pub window_capacity: usize,
    /// Mean fold score at or above which the hand counts as clenched
    pub clench_threshold: f32,
    /// Optional lower threshold for releasing an engaged clench
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_threshold: Option<f32>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_capacity: 3,
            clench_threshold: 0.6,
            release_threshold: None,
        }
    }
}

/// Options passed to a landmark source when it is acquired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOptions {
    pub max_num_hands: u32,
    pub model_complexity: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Delay between delivered frames, for sources that pace themselves
    #[serde(with = "duration_millis_serde")]
    pub frame_interval: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            max_num_hands: 1,
            model_complexity: 0,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
            frame_width: 640,
            frame_height: 480,
            frame_interval: Duration::from_millis(33),
        }
    }
}

impl SourceOptions {
    /// Set the frame interval from a frames-per-second rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        if fps > 0 {
            self.frame_interval = Duration::from_micros(1_000_000 / u64::from(fps));
        }
        self
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration (whole seconds).
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Serde support for Duration (milliseconds).
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
