//! Key-phase detection for a single swing.
//!
//! # Algorithm
//!
//! 1. **Velocity**: wrist speed at every frame (see [`MetricExtractor::limb_tip_velocity`]).
//! 2. **Contact**: the first frame reaching the global peak speed. No peak, no phases.
//! 3. **Preparation**: first frame before contact slower than a fraction of the peak.
//! 4. **Backswing peak**: tightest elbow angle within a fixed frame window before contact.
//! 5. **Follow-through**: first frame after contact slower than a (larger) fraction of the peak.
//! 6. **Finish**: the last frame.
//!
//! The detector assumes one dominant acceleration event per sequence. With
//! several swings only the fastest one is segmented.

use swingsync_common::config::AnalysisConfig;
use swingsync_pose_model::frame::Sequence;
use swingsync_pose_model::{KeyPose, KeyPoseType};

use crate::metrics::MetricExtractor;

/// Swing phase detector.
#[derive(Debug, Clone)]
pub struct PhaseDetector {
    extractor: MetricExtractor,
}

impl PhaseDetector {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            extractor: MetricExtractor::new(config),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    /// Build a detector sharing an existing extractor's configuration.
    pub fn from_extractor(extractor: MetricExtractor) -> Self {
        Self { extractor }
    }

    /// Detect key poses, sorted by frame index (ties in canonical phase order).
    ///
    /// Returns an empty list when the wrist never moves measurably.
    pub fn detect(&self, seq: &Sequence) -> Vec<KeyPose> {
        let config = self.extractor.config();
        let velocities = self.extractor.velocities(seq);

        let Some((contact, peak)) = peak_velocity(&velocities) else {
            tracing::debug!(frames = seq.len(), "No wrist motion, no key poses");
            return vec![];
        };

        let pose = |index: usize, kind: KeyPoseType| KeyPose {
            frame_index: index,
            kind,
            timestamp: seq.frames()[index].timestamp,
            confidence: kind.confidence(),
        };

        let mut poses = vec![pose(contact, KeyPoseType::BallContact)];

        let prep_limit = peak * config.preparation_velocity_ratio;
        if let Some(i) = velocities[..contact].iter().position(|&v| v < prep_limit) {
            poses.push(pose(i, KeyPoseType::Preparation));
        }

        if let Some(i) = self.backswing_peak(seq, contact) {
            poses.push(pose(i, KeyPoseType::BackswingPeak));
        }

        let follow_limit = peak * config.follow_through_velocity_ratio;
        if let Some(offset) = velocities[contact + 1..]
            .iter()
            .position(|&v| v < follow_limit)
        {
            poses.push(pose(contact + 1 + offset, KeyPoseType::FollowThrough));
        }

        poses.push(pose(seq.last_index(), KeyPoseType::Finish));

        poses.sort_by_key(|p| (p.frame_index, p.kind));

        let summary: Vec<(&str, usize)> = poses
            .iter()
            .map(|p| (p.kind.as_str(), p.frame_index))
            .collect();
        tracing::debug!(
            frames = seq.len(),
            peak_velocity = peak,
            poses = ?summary,
            "Detected key poses"
        );

        poses
    }

    /// Frame with the smallest positive elbow angle in the window before contact.
    fn backswing_peak(&self, seq: &Sequence, contact: usize) -> Option<usize> {
        let window = self.extractor.config().backswing_window_frames;
        let start = contact.saturating_sub(window);
        let frames = seq.frames();

        let mut best: Option<(usize, f64)> = None;
        for (i, frame) in frames.iter().enumerate().take(contact).skip(start) {
            let Some(angle) = self.extractor.elbow_angle(frame) else {
                continue;
            };
            if angle <= 0.0 {
                continue;
            }
            if best.map_or(true, |(_, min)| angle < min) {
                best = Some((i, angle));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// First index of the global maximum, if that maximum is positive.
fn peak_velocity(velocities: &[f64]) -> Option<(usize, f64)> {
    let mut peak: Option<(usize, f64)> = None;
    for (i, &v) in velocities.iter().enumerate() {
        if v > peak.map_or(0.0, |(_, max)| max) {
            peak = Some((i, v));
        }
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;
    use swingsync_pose_model::frame::Frame;
    use swingsync_pose_model::keypoint::{
        Keypoint, LANDMARK_COUNT, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_WRIST,
    };

    /// Frame with a visible right arm and the wrist at `(wrist_x, wrist_y)`.
    fn arm_frame(t: u64, wrist_x: f64, wrist_y: f64) -> Frame {
        let mut keypoints = vec![Keypoint::hidden(); LANDMARK_COUNT];
        keypoints[RIGHT_SHOULDER] = Keypoint::new(0.5, 0.3, 0.95);
        keypoints[RIGHT_ELBOW] = Keypoint::new(0.5, 0.4, 0.95);
        keypoints[RIGHT_WRIST] = Keypoint::new(wrist_x, wrist_y, 0.95);
        Frame::new(t, keypoints)
    }

    fn sequence(wrist: &[(f64, f64)]) -> Sequence {
        Sequence::new(
            wrist
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| arm_frame(i as u64 * 100, x, y))
                .collect(),
        )
        .unwrap()
    }

    fn kinds(poses: &[KeyPose]) -> Vec<KeyPoseType> {
        poses.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn test_static_sequence_has_no_poses() {
        let seq = sequence(&[(0.6, 0.4); 10]);
        assert!(PhaseDetector::with_defaults().detect(&seq).is_empty());
    }

    #[test]
    fn test_single_frame_has_no_poses() {
        let seq = sequence(&[(0.6, 0.4)]);
        assert!(PhaseDetector::with_defaults().detect(&seq).is_empty());
    }

    #[test]
    fn test_full_swing_phases() {
        // Rest, wind back (elbow closes), fast strike, slow down, rest.
        let wrist = [
            (0.60, 0.40),
            (0.60, 0.40),
            (0.58, 0.38),
            (0.55, 0.35),
            (0.54, 0.33),
            (0.60, 0.40),
            (0.75, 0.45),
            (0.85, 0.45),
            (0.88, 0.45),
            (0.89, 0.45),
            (0.89, 0.45),
        ];
        let seq = sequence(&wrist);
        let poses = PhaseDetector::with_defaults().detect(&seq);

        assert_eq!(
            kinds(&poses),
            vec![
                KeyPoseType::Preparation,
                KeyPoseType::BackswingPeak,
                KeyPoseType::BallContact,
                KeyPoseType::FollowThrough,
                KeyPoseType::Finish,
            ]
        );

        let contact = poses[2];
        assert_eq!(contact.frame_index, 6);
        assert_eq!(contact.timestamp, 600);
        assert_eq!(contact.confidence, 0.9);

        assert_eq!(poses[0].frame_index, 0);
        assert_eq!(poses[0].confidence, 0.7);
        assert_eq!(poses[1].frame_index, 4);
        assert_eq!(poses[3].frame_index, 8);
        assert_eq!(poses[4].frame_index, 10);
    }

    #[test]
    fn test_hidden_elbow_skips_backswing_peak() {
        let wrist = [
            (0.60, 0.40),
            (0.60, 0.40),
            (0.58, 0.38),
            (0.55, 0.35),
            (0.54, 0.33),
            (0.60, 0.40),
            (0.75, 0.45),
            (0.85, 0.45),
            (0.88, 0.45),
            (0.89, 0.45),
            (0.89, 0.45),
        ];
        let frames = wrist
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut frame = arm_frame(i as u64 * 100, x, y);
                frame.keypoints[RIGHT_ELBOW].visibility = 0.1;
                frame
            })
            .collect();
        let seq = Sequence::new(frames).unwrap();
        let poses = PhaseDetector::with_defaults().detect(&seq);

        assert_eq!(
            kinds(&poses),
            vec![
                KeyPoseType::Preparation,
                KeyPoseType::BallContact,
                KeyPoseType::FollowThrough,
                KeyPoseType::Finish,
            ]
        );
        assert_eq!(poses[1].frame_index, 6);
        assert_eq!(poses[3].frame_index, 10);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let seq = sequence(&[
            (0.6, 0.4),
            (0.62, 0.41),
            (0.7, 0.43),
            (0.85, 0.45),
            (0.86, 0.45),
        ]);
        let detector = PhaseDetector::with_defaults();
        assert_eq!(detector.detect(&seq), detector.detect(&seq));
    }

    #[test]
    fn test_backswing_window_is_bounded() {
        let config = AnalysisConfig {
            backswing_window_frames: 1,
            ..Default::default()
        };
        let wrist = [
            (0.54, 0.33),
            (0.60, 0.40),
            (0.60, 0.40),
            (0.62, 0.41),
            (0.90, 0.45),
            (0.91, 0.45),
        ];
        let poses = PhaseDetector::new(config).detect(&sequence(&wrist));
        let contact = poses
            .iter()
            .find(|p| p.kind == KeyPoseType::BallContact)
            .unwrap();
        let backswing = poses
            .iter()
            .find(|p| p.kind == KeyPoseType::BackswingPeak)
            .unwrap();
        assert_eq!(contact.frame_index, 3);
        assert_eq!(backswing.frame_index, 2);
    }

    #[test]
    fn test_sorted_with_canonical_tie_break() {
        // Follow-through lands on the last frame, which is also the finish.
        let seq = sequence(&[(0.6, 0.4), (0.6, 0.4), (0.6, 0.4), (0.9, 0.4), (0.9, 0.4)]);
        let poses = PhaseDetector::with_defaults().detect(&seq);
        let tail: Vec<_> = poses
            .iter()
            .rev()
            .take(2)
            .map(|p| (p.frame_index, p.kind))
            .collect();
        assert_eq!(
            tail,
            vec![(4, KeyPoseType::Finish), (4, KeyPoseType::FollowThrough)]
        );
        for pair in poses.windows(2) {
            assert!(pair[0].frame_index <= pair[1].frame_index);
        }
    }

    #[test]
    fn test_peak_velocity_picks_first_maximum() {
        assert_eq!(peak_velocity(&[0.0, 2.0, 1.0, 2.0]), Some((1, 2.0)));
        assert_eq!(peak_velocity(&[0.0, 0.0]), None);
        assert_eq!(peak_velocity(&[]), None);
    }
}
