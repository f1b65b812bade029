//! Compare two stored analysis results.

use std::path::PathBuf;

use swingsync_common::config::AppConfig;
use swingsync_common::error::SwingsyncError;
use swingsync_motion_core::compare::compare;
use swingsync_motion_core::pipeline::store_error;
use swingsync_pose_model::{AnalysisResult, DirectoryStore, ResultStore};

use super::results_dir;

fn fetch(store: &DirectoryStore, id: &str) -> anyhow::Result<AnalysisResult> {
    store
        .get(id)
        .map_err(store_error)?
        .ok_or_else(|| SwingsyncError::result_not_found(id).into())
}

pub fn run(
    config: &AppConfig,
    user_id: String,
    reference_id: String,
    label: Option<String>,
    dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let store = DirectoryStore::new(results_dir(dir, config));
    let user = fetch(&store, &user_id)?;
    let reference = fetch(&store, &reference_id)?;

    let label = label.unwrap_or_else(|| reference_id.clone());
    let report = compare(&user.metrics, &reference.metrics, &label);

    println!("{user_id} vs {label}:");
    println!("  Elbow angle diff: {:+.1}°", report.elbow_angle_diff);
    println!(
        "  Shoulder rotation diff: {:+.2}",
        report.shoulder_rotation_diff
    );
    println!("  Impact count diff: {:+}", report.impact_count_diff);
    Ok(())
}
