//! Metric differences between a user recording and a reference.

use swingsync_pose_model::{ComparisonReport, MetricSet};

/// Plain `user - reference` differences. No clamping; the label is passed through.
pub fn compare(user: &MetricSet, reference: &MetricSet, label: &str) -> ComparisonReport {
    let report = ComparisonReport {
        elbow_angle_diff: user.elbow_angle_max - reference.elbow_angle_max,
        shoulder_rotation_diff: user.shoulder_rotation_proxy - reference.shoulder_rotation_proxy,
        impact_count_diff: user.impact_frames.len() as i64 - reference.impact_frames.len() as i64,
        reference_label: label.to_string(),
    };
    tracing::debug!(
        label,
        elbow_angle_diff = report.elbow_angle_diff,
        shoulder_rotation_diff = report.shoulder_rotation_diff,
        "Compared metric sets"
    );
    report
}
