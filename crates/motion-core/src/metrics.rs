//! Biomechanical metric extraction.
//!
//! Reduces a keypoint sequence to the measures consumed by phase detection
//! and comparison. Missing or low-confidence keypoints are never replaced
//! by defaults: the affected frame is skipped, and an aggregate with no
//! usable frame at all reports 0 (or an empty series).
//!
//! Callers that need to tell "no data" from "measured zero" must look at
//! the sequence itself, e.g. via [`MetricExtractor::frames_used`].

use swingsync_common::config::AnalysisConfig;
use swingsync_pose_model::frame::{Frame, Sequence, TimestampMs};
use swingsync_pose_model::keypoint::{ArmLandmarks, Keypoint, LEFT_SHOULDER, RIGHT_SHOULDER};
use swingsync_pose_model::MetricSet;

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees `[0, 180]`.
///
/// Uses the four-quadrant arctangent of each ray; differences over 180°
/// are reflected to `360 − value`.
pub fn joint_angle_deg(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Strict local maxima of a tempo series above `threshold`.
///
/// Endpoints never qualify and adjacent peaks are all reported.
pub fn impact_peaks(tempo: &[(TimestampMs, f64)], threshold: f64) -> Vec<TimestampMs> {
    tempo
        .windows(3)
        .filter(|w| w[1].1 > w[0].1 && w[1].1 > w[2].1 && w[1].1 > threshold)
        .map(|w| w[1].0)
        .collect()
}

/// Metric extraction engine.
#[derive(Debug, Clone)]
pub struct MetricExtractor {
    config: AnalysisConfig,
    arm: ArmLandmarks,
}

impl MetricExtractor {
    /// Create an extractor with the given thresholds.
    pub fn new(config: AnalysisConfig) -> Self {
        let arm = ArmLandmarks::for_side(config.dominant_side);
        Self { config, arm }
    }

    /// Create an extractor with default thresholds.
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Joint angle, or `None` if any of the three keypoints is unusable.
    pub fn joint_angle(&self, a: &Keypoint, b: &Keypoint, c: &Keypoint) -> Option<f64> {
        let threshold = self.config.visibility_threshold;
        (a.is_usable(threshold) && b.is_usable(threshold) && c.is_usable(threshold))
            .then(|| joint_angle_deg(a, b, c))
    }

    /// Dominant-arm elbow angle of one frame.
    pub fn elbow_angle(&self, frame: &Frame) -> Option<f64> {
        let shoulder = frame.keypoint(self.arm.shoulder)?;
        let elbow = frame.keypoint(self.arm.elbow)?;
        let wrist = frame.keypoint(self.arm.wrist)?;
        self.joint_angle(shoulder, elbow, wrist)
    }

    fn tip<'f>(&self, frame: &'f Frame) -> Option<&'f Keypoint> {
        frame.usable(self.arm.wrist, self.config.visibility_threshold)
    }

    /// Central-difference speed of the dominant wrist at frame `i`
    /// (normalized units per second).
    ///
    /// Returns 0 at the sequence boundaries, past the end, when either
    /// neighbouring wrist is unusable, or when both neighbours share a
    /// timestamp.
    pub fn limb_tip_velocity(&self, seq: &Sequence, i: usize) -> f64 {
        if i == 0 || i >= seq.last_index() {
            return 0.0;
        }
        let frames = seq.frames();
        let (prev, next) = (&frames[i - 1], &frames[i + 1]);
        let (Some(p), Some(n)) = (self.tip(prev), self.tip(next)) else {
            return 0.0;
        };

        let dt = (next.timestamp - prev.timestamp) as f64 / 1000.0;
        if dt <= 0.0 {
            return 0.0;
        }
        p.distance_to(n) / dt
    }

    /// `limb_tip_velocity` for every frame index.
    pub fn velocities(&self, seq: &Sequence) -> Vec<f64> {
        (0..seq.len())
            .map(|i| self.limb_tip_velocity(seq, i))
            .collect()
    }

    /// Largest dominant-arm elbow angle over all frames, 0 if none is measurable.
    pub fn max_elbow_angle(&self, seq: &Sequence) -> f64 {
        seq.frames()
            .iter()
            .filter_map(|f| self.elbow_angle(f))
            .fold(0.0, f64::max)
    }

    /// Range (max − min) of the shoulder-to-shoulder distance.
    ///
    /// A 2D proxy for trunk rotation, not a true rotation angle.
    pub fn shoulder_separation_range(&self, seq: &Sequence) -> f64 {
        let threshold = self.config.visibility_threshold;
        let mut range: Option<(f64, f64)> = None;

        for frame in seq.frames() {
            let (Some(left), Some(right)) = (
                frame.usable(LEFT_SHOULDER, threshold),
                frame.usable(RIGHT_SHOULDER, threshold),
            ) else {
                continue;
            };
            let dist = left.distance_to(right);
            range = Some(match range {
                None => (dist, dist),
                Some((lo, hi)) => (lo.min(dist), hi.max(dist)),
            });
        }

        range.map_or(0.0, |(lo, hi)| hi - lo)
    }

    /// Shoulder separation range in reporting units.
    pub fn shoulder_rotation_proxy(&self, seq: &Sequence) -> f64 {
        self.shoulder_separation_range(seq) * self.config.report_scale
    }

    /// `(timestamp, scaled wrist speed)` for each interior frame whose two
    /// neighbours have a usable wrist.
    pub fn tempo_series(&self, seq: &Sequence) -> Vec<(TimestampMs, f64)> {
        if seq.len() < 3 {
            return vec![];
        }
        let frames = seq.frames();
        (1..seq.last_index())
            .filter(|&i| self.tip(&frames[i - 1]).is_some() && self.tip(&frames[i + 1]).is_some())
            .map(|i| {
                (
                    frames[i].timestamp,
                    self.limb_tip_velocity(seq, i) * self.config.report_scale,
                )
            })
            .collect()
    }

    /// Timestamps of tempo peaks above the impact threshold.
    pub fn impact_frames(&self, seq: &Sequence) -> Vec<TimestampMs> {
        impact_peaks(&self.tempo_series(seq), self.config.impact_threshold)
    }

    /// Number of frames whose dominant wrist is usable.
    pub fn frames_used(&self, seq: &Sequence) -> usize {
        seq.frames().iter().filter(|f| self.tip(f).is_some()).count()
    }

    /// Full metric set of one sequence.
    pub fn extract(&self, seq: &Sequence) -> MetricSet {
        let tempo_series = self.tempo_series(seq);
        let impact_frames = impact_peaks(&tempo_series, self.config.impact_threshold);
        MetricSet {
            elbow_angle_max: self.max_elbow_angle(seq),
            shoulder_rotation_proxy: self.shoulder_rotation_proxy(seq),
            tempo_series,
            impact_frames,
        }
    }
}
