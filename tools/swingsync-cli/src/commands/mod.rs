pub mod analyze;
pub mod compare;
pub mod demo;
pub mod phases;
pub mod show;
pub mod sync;
pub mod validate;

use std::path::{Path, PathBuf};

use swingsync_common::config::AppConfig;
use swingsync_motion_core::pipeline::load_recording;
use swingsync_pose_model::PoseRecording;

/// Load a recording, falling back to the configured capture rate.
pub(crate) fn open_recording(path: &Path, config: &AppConfig) -> anyhow::Result<PoseRecording> {
    load_recording(path, config.analysis.default_fps)
        .map_err(|e| anyhow::anyhow!("Failed to load recording {}: {e}", path.display()))
}

/// Results directory from the command line or the configuration.
pub(crate) fn results_dir(override_dir: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    override_dir.unwrap_or_else(|| config.results_dir.clone())
}

/// File name of a path, for use as a display label.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
