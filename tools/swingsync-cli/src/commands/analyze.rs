//! Analyze a recording and store the result.

use std::path::PathBuf;

use swingsync_common::config::AppConfig;
use swingsync_motion_core::pipeline::store_error;
use swingsync_motion_core::SwingAnalyzer;
use swingsync_pose_model::{new_analysis_id, AnalysisResult, DirectoryStore, ResultStore};

use super::{file_label, open_recording, results_dir};

pub fn run(
    config: &AppConfig,
    recording: PathBuf,
    reference: Option<PathBuf>,
    label: Option<String>,
    out_dir: Option<PathBuf>,
    no_save: bool,
) -> anyhow::Result<()> {
    println!("Analyzing recording: {}", recording.display());

    let user = open_recording(&recording, config)?;
    println!(
        "  Loaded {} frames @ {}fps ({} ms)",
        user.sequence.len(),
        user.rate.fps(),
        user.sequence.duration_ms()
    );

    let analyzer = SwingAnalyzer::new(config.analysis.clone());
    let mut result = match reference {
        Some(path) => {
            let reference = open_recording(&path, config)?;
            let label = label.unwrap_or_else(|| file_label(&path));
            println!(
                "  Reference: {} ({} frames)",
                label,
                reference.sequence.len()
            );
            analyzer.analyze_against(&user, &reference, &label)
        }
        None => analyzer.analyze(&user),
    };
    result.stamp_now();

    print_summary(&result);

    if no_save {
        println!("\n{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let store = DirectoryStore::new(results_dir(out_dir, config));
    let id = new_analysis_id();
    store.save(&id, &result).map_err(store_error)?;

    tracing::info!(id = %id, dir = %store.root().display(), "Stored analysis result");
    println!("\nStored result {id} in {}", store.root().display());
    Ok(())
}

fn print_summary(result: &AnalysisResult) {
    println!(
        "  Stroke: {:?} (confidence {:.2})",
        result.summary.stroke_guess, result.summary.confidence
    );
    println!("  Max elbow angle: {:.1}°", result.metrics.elbow_angle_max);
    println!(
        "  Shoulder rotation proxy: {:.2}",
        result.metrics.shoulder_rotation_proxy
    );
    println!("  Impacts: {:?}", result.metrics.impact_frames);

    if result.meta.fallback {
        println!("  No swing phases detected.");
    } else {
        println!("  Key poses:");
        for pose in &result.key_poses {
            println!(
                "    {:<15} frame {:>4} @ {:>6} ms",
                pose.kind, pose.frame_index, pose.timestamp
            );
        }
    }

    if let Some(ref comparison) = result.comparison {
        println!("  Against {}:", comparison.reference_label);
        println!("    Elbow angle diff: {:+.1}°", comparison.elbow_angle_diff);
        println!(
            "    Shoulder rotation diff: {:+.2}",
            comparison.shoulder_rotation_diff
        );
        println!("    Impact count diff: {:+}", comparison.impact_count_diff);
    }
    if let Some(ref sync) = result.sync {
        println!(
            "    Offset: {:.1} ms ({:?}, {} segments)",
            sync.offset_ms, sync.strategy, sync.segments
        );
    }
}
