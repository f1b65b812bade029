//! Application configuration.
//!
//! The analysis heuristics (visibility cutoff, velocity fractions, search
//! windows, impact threshold) all live in [`AnalysisConfig`] so they can be
//! tuned without touching the algorithms in `swingsync-motion-core`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{SwingsyncError, SwingsyncResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where analysis results are stored.
    pub results_dir: PathBuf,

    /// Heuristic thresholds for metric extraction, phase detection and alignment.
    pub analysis: AnalysisConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Which arm holds the racquet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

/// Tunable thresholds used by the analysis core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Arm used for elbow angle and limb-tip velocity.
    pub dominant_side: Side,

    /// A keypoint is usable only when its visibility is strictly above this.
    pub visibility_threshold: f64,

    /// Preparation is the first pre-contact frame slower than
    /// `preparation_velocity_ratio * peak_velocity`.
    pub preparation_velocity_ratio: f64,

    /// Follow-through is the first post-contact frame slower than
    /// `follow_through_velocity_ratio * peak_velocity`.
    pub follow_through_velocity_ratio: f64,

    /// Number of frames before contact searched for the backswing peak.
    ///
    /// This is a frame count, not a duration, so its reach in time depends
    /// on the capture rate.
    pub backswing_window_frames: usize,

    /// Minimum scaled tempo value for a local peak to count as an impact.
    pub impact_threshold: f64,

    /// Reporting multiplier applied to tempo velocities and the shoulder
    /// separation range. A unit convention, not a physical conversion.
    pub report_scale: f64,

    /// Weight of the ball-contact phase in the scalar offset estimate.
    /// Every other phase weighs 1.0.
    pub contact_weight: f64,

    /// Capture rate assumed when a recording does not declare one.
    pub default_fps: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "swingsync=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            results_dir: dirs_default_results(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dominant_side: Side::Right,
            visibility_threshold: 0.5,
            preparation_velocity_ratio: 0.1,
            follow_through_velocity_ratio: 0.3,
            backswing_window_frames: 15,
            impact_threshold: 30.0,
            report_scale: 100.0,
            contact_weight: 3.0,
            default_fps: 30.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AnalysisConfig {
    /// Check that the thresholds describe a usable configuration.
    pub fn validate(&self) -> SwingsyncResult<()> {
        if !(0.0..1.0).contains(&self.visibility_threshold) {
            return Err(SwingsyncError::config(format!(
                "visibility_threshold must be in [0, 1), got {}",
                self.visibility_threshold
            )));
        }
        for (name, ratio) in [
            ("preparation_velocity_ratio", self.preparation_velocity_ratio),
            (
                "follow_through_velocity_ratio",
                self.follow_through_velocity_ratio,
            ),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(SwingsyncError::config(format!(
                    "{name} must be in (0, 1], got {ratio}"
                )));
            }
        }
        if self.report_scale <= 0.0 {
            return Err(SwingsyncError::config(format!(
                "report_scale must be positive, got {}",
                self.report_scale
            )));
        }
        if self.contact_weight <= 0.0 {
            return Err(SwingsyncError::config(format!(
                "contact_weight must be positive, got {}",
                self.contact_weight
            )));
        }
        if self.default_fps <= 0.0 {
            return Err(SwingsyncError::config(format!(
                "default_fps must be positive, got {}",
                self.default_fps
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(config) => match config.analysis.validate() {
                        Ok(()) => return config,
                        Err(e) => {
                            tracing::warn!("Ignoring invalid config at {:?}: {}", config_path, e);
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("swingsync").join("config.json")
}

/// Default results directory.
fn dirs_default_results() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("swingsync").join("results")
}
