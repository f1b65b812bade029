//! Derived analysis contracts.
//!
//! Everything here is computed from one or two sequences and carries no
//! state of its own. Field names are camelCase on the wire so stored
//! results stay readable by the presentation layer.

use serde::{Deserialize, Serialize};

use crate::frame::TimestampMs;

/// Named instants of a single racquet swing, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPoseType {
    Preparation,
    BackswingPeak,
    BallContact,
    FollowThrough,
    Finish,
}

impl KeyPoseType {
    /// All phases in the order they occur in a swing.
    pub const CANONICAL: [KeyPoseType; 5] = [
        KeyPoseType::Preparation,
        KeyPoseType::BackswingPeak,
        KeyPoseType::BallContact,
        KeyPoseType::FollowThrough,
        KeyPoseType::Finish,
    ];

    /// Fixed heuristic confidence reported for a detected phase.
    pub fn confidence(self) -> f64 {
        match self {
            KeyPoseType::BallContact => 0.9,
            KeyPoseType::BackswingPeak => 0.8,
            KeyPoseType::FollowThrough => 0.75,
            KeyPoseType::Preparation => 0.7,
            KeyPoseType::Finish => 0.6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyPoseType::Preparation => "preparation",
            KeyPoseType::BackswingPeak => "backswing_peak",
            KeyPoseType::BallContact => "ball_contact",
            KeyPoseType::FollowThrough => "follow_through",
            KeyPoseType::Finish => "finish",
        }
    }
}

impl std::fmt::Display for KeyPoseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A detected phase instant within one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPose {
    pub frame_index: usize,
    #[serde(rename = "type")]
    pub kind: KeyPoseType,
    pub timestamp: TimestampMs,
    pub confidence: f64,
}

/// Find the pose of a given phase in a detected list.
pub fn find_pose(poses: &[KeyPose], kind: KeyPoseType) -> Option<&KeyPose> {
    poses.iter().find(|p| p.kind == kind)
}

/// Correspondence of one user frame to one reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMapping {
    pub user_frame: usize,
    pub reference_frame: usize,
}

/// Biomechanical measures of one sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSet {
    /// Largest dominant-arm elbow angle in degrees.
    pub elbow_angle_max: f64,
    /// Shoulder separation range, scaled for reporting.
    pub shoulder_rotation_proxy: f64,
    /// `(timestamp, scaled wrist speed)` pairs.
    pub tempo_series: Vec<(TimestampMs, f64)>,
    /// Timestamps of detected tempo peaks.
    pub impact_frames: Vec<TimestampMs>,
}

/// Metric differences between a user and a named reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub elbow_angle_diff: f64,
    pub shoulder_rotation_diff: f64,
    #[serde(default)]
    pub impact_count_diff: i64,
    #[serde(alias = "referenceVideo")]
    pub reference_label: String,
}

/// Coarse stroke classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeGuess {
    Forehand,
    Backhand,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSummary {
    pub stroke_guess: StrokeGuess,
    pub confidence: f64,
}

/// How a frame mapping was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Piecewise-linear between matched phase boundaries.
    PhaseSegments,
    /// Proportional stretch of the whole user sequence.
    Linear,
}

/// Temporal alignment between a user and a reference recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    /// Positive means the reference should be shifted later.
    pub offset_ms: f64,
    pub strategy: MappingStrategy,
    /// Number of phase segments used for the mapping.
    pub segments: usize,
    pub mapping: Vec<SyncMapping>,
}

/// Recording metadata attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub fps: f64,
    pub sample_ms: f64,
    /// Frames whose dominant wrist was usable.
    pub frames_used: usize,
    /// ISO 8601 time of analysis.
    #[serde(default)]
    pub analyzed_at: String,
    /// Set when no phase could be detected in the user sequence.
    #[serde(default)]
    pub fallback: bool,
}

/// Complete stored analysis of one recording, optionally against a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: StrokeSummary,
    pub metrics: MetricSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_metrics: Option<MetricSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_poses: Vec<KeyPose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncSummary>,
    pub meta: AnalysisMeta,
}

impl AnalysisResult {
    /// Record the current wall-clock time as the analysis time.
    pub fn stamp_now(&mut self) {
        self.meta.analyzed_at = chrono::Utc::now().to_rfc3339();
    }
}
