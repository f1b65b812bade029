//! Print a stored analysis result.

use std::path::PathBuf;

use swingsync_common::config::AppConfig;
use swingsync_common::error::SwingsyncError;
use swingsync_motion_core::pipeline::store_error;
use swingsync_pose_model::{DirectoryStore, ResultStore};

use super::results_dir;

pub fn run(config: &AppConfig, id: String, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let store = DirectoryStore::new(results_dir(dir, config));
    let result = store
        .get(&id)
        .map_err(store_error)?
        .ok_or(SwingsyncError::result_not_found(&id))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
