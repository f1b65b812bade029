use std::path::PathBuf;

use swingsync_motion_core::align::TemporalAligner;
use swingsync_motion_core::pipeline::load_recording;
use swingsync_motion_core::{PhaseDetector, SwingAnalyzer};
use swingsync_pose_model::{KeyPose, KeyPoseType, MappingStrategy, PoseRecording, StrokeGuess};

fn fixture(name: &str) -> PoseRecording {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name);
    load_recording(path, 30.0).expect("fixture recording should load")
}

fn phase_frames(poses: &[KeyPose]) -> Vec<(KeyPoseType, usize)> {
    poses.iter().map(|p| (p.kind, p.frame_index)).collect()
}

#[test]
fn user_fixture_phases_are_stable() {
    let user = fixture("forehand-user.json");
    assert_eq!(user.sequence.len(), 40);
    assert_eq!(user.rate.fps(), 30.0);

    let poses = PhaseDetector::with_defaults().detect(&user.sequence);
    assert_eq!(
        phase_frames(&poses),
        vec![
            (KeyPoseType::Preparation, 0),
            (KeyPoseType::BackswingPeak, 17),
            (KeyPoseType::BallContact, 22),
            (KeyPoseType::FollowThrough, 25),
            (KeyPoseType::Finish, 39),
        ]
    );
    assert_eq!(poses[2].timestamp, 733);
}

#[test]
fn reference_fixture_phases_are_stable() {
    let reference = fixture("forehand-reference.json");
    let poses = PhaseDetector::with_defaults().detect(&reference.sequence);
    assert_eq!(
        phase_frames(&poses),
        vec![
            (KeyPoseType::Preparation, 0),
            (KeyPoseType::BackswingPeak, 21),
            (KeyPoseType::BallContact, 25),
            (KeyPoseType::FollowThrough, 28),
            (KeyPoseType::Finish, 39),
        ]
    );
}

#[test]
fn fixture_metrics() {
    let user = fixture("forehand-user.json");
    let result = SwingAnalyzer::with_defaults().analyze(&user);

    assert_eq!(result.summary.stroke_guess, StrokeGuess::Forehand);
    assert!((result.metrics.elbow_angle_max - 174.83).abs() < 0.01);
    assert_eq!(result.metrics.tempo_series.len(), 38);
    assert_eq!(result.metrics.impact_frames, vec![400, 733, 1000]);
    assert!((result.meta.sample_ms - 33.333).abs() < 0.001);
}

#[test]
fn fixture_pair_alignment() {
    let user = fixture("forehand-user.json");
    let reference = fixture("forehand-reference.json");
    let sync = TemporalAligner::with_defaults().align(&user.sequence, &reference.sequence);

    // Backswing -134 ms, contact -100 ms (x3), follow-through -100 ms.
    assert!((sync.offset_ms - (-534.0 / 7.0)).abs() < 1e-9);
    assert_eq!(sync.strategy, MappingStrategy::PhaseSegments);
    assert_eq!(sync.segments, 4);

    let refs: Vec<usize> = sync.mapping.iter().map(|m| m.reference_frame).collect();
    assert_eq!(
        refs,
        vec![
            0, 1, 2, 4, 5, 6, 7, 9, 10, 11, 12, 14, 15, 16, 17, 19, 20, 21, 22, 23, 23, 24, 25,
            26, 27, 28, 29, 30, 30, 31, 32, 33, 34, 34, 35, 36, 37, 37, 38, 39,
        ]
    );
}

#[test]
fn fixture_comparison_report() {
    let user = fixture("forehand-user.json");
    let reference = fixture("forehand-reference.json");
    let result =
        SwingAnalyzer::with_defaults().analyze_against(&user, &reference, "forehand-reference");

    let comparison = result.comparison.expect("comparison should be present");
    let reference_metrics = result.reference_metrics.expect("reference metrics present");
    assert_eq!(comparison.reference_label, "forehand-reference");
    assert_eq!(
        comparison.elbow_angle_diff,
        result.metrics.elbow_angle_max - reference_metrics.elbow_angle_max
    );
    assert_eq!(comparison.impact_count_diff, 0);
}
