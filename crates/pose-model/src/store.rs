//! Persistence of analysis results keyed by id.

use std::path::{Path, PathBuf};

use crate::analysis::AnalysisResult;
use crate::frame::ModelError;

/// Key/value storage for analysis results.
pub trait ResultStore {
    fn save(&self, id: &str, result: &AnalysisResult) -> Result<(), ModelError>;

    /// Returns `Ok(None)` when no result is stored under `id`.
    fn get(&self, id: &str) -> Result<Option<AnalysisResult>, ModelError>;
}

/// Stores each result as `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, ModelError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ModelError::InvalidId { id: id.to_string() });
        }
        Ok(self.root.join(format!("{id}.json")))
    }
}

impl ResultStore for DirectoryStore {
    fn save(&self, id: &str, result: &AnalysisResult) -> Result<(), ModelError> {
        let path = self.path_for(id)?;
        std::fs::create_dir_all(&self.root).map_err(|e| ModelError::IoError {
            path: self.root.clone(),
            source: e,
        })?;
        let json = serde_json::to_string_pretty(result).map_err(|e| ModelError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ModelError::IoError {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(id, path = %path.display(), "Saved analysis result");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<AnalysisResult>, ModelError> {
        let path = self.path_for(id)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ModelError::IoError { path, source: e }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ModelError::ParseError { path, source: e })
    }
}

/// Generate a random-looking UUID v4 string without an external dependency.
pub fn new_analysis_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed) as u128;
    let seed = nanos ^ (count.wrapping_mul(0x9E37_79B9_7F4A_7C15) << 17);

    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFF_FFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3FFF) as u16) | 0x8000,
        (seed >> 76) & 0xFFFF_FFFF_FFFF,
    )
}
