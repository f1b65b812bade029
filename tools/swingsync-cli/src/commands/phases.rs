//! Print the key poses of a recording.

use std::path::PathBuf;

use swingsync_common::config::AppConfig;
use swingsync_motion_core::PhaseDetector;

use super::open_recording;

pub fn run(config: &AppConfig, recording: PathBuf, json: bool) -> anyhow::Result<()> {
    let recording = open_recording(&recording, config)?;
    let poses = PhaseDetector::new(config.analysis.clone()).detect(&recording.sequence);

    if json {
        println!("{}", serde_json::to_string_pretty(&poses)?);
        return Ok(());
    }

    if poses.is_empty() {
        println!("No swing phases detected ({} frames).", recording.sequence.len());
        return Ok(());
    }

    println!("{:<15} {:>6} {:>9} {:>6}", "PHASE", "FRAME", "TIME(ms)", "CONF");
    for pose in &poses {
        println!(
            "{:<15} {:>6} {:>9} {:>6.2}",
            pose.kind.as_str(),
            pose.frame_index,
            pose.timestamp,
            pose.confidence
        );
    }
    Ok(())
}
