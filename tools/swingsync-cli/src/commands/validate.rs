//! Validate a pose recording file.

use std::path::PathBuf;

use swingsync_common::clock::{audit_timestamps, CaptureRate, TimestampAudit};
use swingsync_common::config::AppConfig;
use swingsync_pose_model::frame::RecordingDocument;
use swingsync_pose_model::keypoint::{landmark_name, ArmLandmarks};

pub fn run(config: &AppConfig, recording: PathBuf) -> anyhow::Result<()> {
    println!("Validating recording at: {}", recording.display());

    let content = std::fs::read_to_string(&recording)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", recording.display()))?;
    let doc: RecordingDocument = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Not a pose recording: {e}"))?;

    let (fps, frames) = match &doc {
        RecordingDocument::Wrapped { fps, pose_data } => {
            (fps.unwrap_or(config.analysis.default_fps), pose_data)
        }
        RecordingDocument::Bare(frames) => (config.analysis.default_fps, frames),
    };
    println!("  Frames: {}", frames.len());
    println!("  FPS: {fps}");

    let mut issues = Vec::new();

    match CaptureRate::new(fps) {
        Some(rate) => {
            let timestamps: Vec<u64> = frames.iter().map(|f| f.timestamp).collect();
            let audit = audit_timestamps(&timestamps, rate);
            println!(
                "  Frame spacing: mean {:.1} ms, max {} ms (nominal {:.1} ms)",
                audit.mean_delta_ms,
                audit.max_delta_ms,
                rate.interval_ms()
            );
            issues.extend(spacing_issues(&audit));
        }
        None => issues.push(format!("capture rate must be positive, got {fps}")),
    }

    // Coverage of the landmarks the analysis depends on.
    let threshold = config.analysis.visibility_threshold;
    let arm = ArmLandmarks::for_side(config.analysis.dominant_side);
    for index in [arm.shoulder, arm.elbow, arm.wrist] {
        let usable = frames.iter().filter(|f| f.usable(index, threshold).is_some()).count();
        println!(
            "  {}: usable in {usable}/{} frames",
            landmark_name(index).unwrap_or("landmark"),
            frames.len()
        );
        if !frames.is_empty() && usable * 2 < frames.len() {
            issues.push(format!(
                "{} is usable in fewer than half of the frames",
                landmark_name(index).unwrap_or("landmark")
            ));
        }
    }

    if let Err(e) = doc.into_recording(config.analysis.default_fps) {
        issues.push(e.to_string());
    }

    if issues.is_empty() {
        println!("\nRecording is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!("\n{} issue(s) found.", issues.len());
    }

    Ok(())
}

fn spacing_issues(audit: &TimestampAudit) -> Vec<String> {
    let mut issues = Vec::new();
    if audit.regressions > 0 {
        issues.push(format!("{} timestamp(s) go backwards", audit.regressions));
    }
    if audit.duplicates > 0 {
        issues.push(format!("{} duplicate timestamp(s)", audit.duplicates));
    }
    if audit.gaps > 0 {
        issues.push(format!(
            "{} gap(s) longer than {}x the nominal interval",
            audit.gaps,
            TimestampAudit::GAP_TOLERANCE
        ));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_issue_names_tolerance() {
        let rate = CaptureRate::new(10.0).unwrap();
        // 100 ms nominal; 140 ms is within tolerance, 200 ms is not.
        let audit = audit_timestamps(&[0, 140, 340], rate);
        assert_eq!(audit.gaps, 1);
        assert_eq!(
            spacing_issues(&audit),
            vec!["1 gap(s) longer than 1.5x the nominal interval".to_string()]
        );
    }

    #[test]
    fn test_clean_spacing_has_no_issues() {
        let rate = CaptureRate::new(10.0).unwrap();
        let audit = audit_timestamps(&[0, 100, 200], rate);
        assert!(spacing_issues(&audit).is_empty());
    }
}
