//! Frames, sequences, and recording documents.
//!
//! A recording arrives from the pose detector either as a bare JSON array
//! of frames or wrapped with its declared capture rate:
//!
//! ```json
//! {"fps": 30, "poseData": [{"timestamp": 0, "keypoints": [...]}, ...]}
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swingsync_common::clock::CaptureRate;

use crate::keypoint::Keypoint;

/// Millisecond timestamp since the start of the recording.
pub type TimestampMs = u64;

/// One time-stamped sample of all tracked landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: TimestampMs,
    pub keypoints: Vec<Keypoint>,
}

impl Frame {
    pub fn new(timestamp: TimestampMs, keypoints: Vec<Keypoint>) -> Self {
        Self {
            timestamp,
            keypoints,
        }
    }

    /// Keypoint at `index`, if the frame has one there.
    pub fn keypoint(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    /// Keypoint at `index` if present and above the visibility threshold.
    pub fn usable(&self, index: usize, threshold: f64) -> Option<&Keypoint> {
        self.keypoint(index).filter(|kp| kp.is_usable(threshold))
    }
}

/// Time-ordered frames of one recording.
///
/// Always holds at least one frame, with non-decreasing timestamps.
/// Duplicate timestamps are allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    frames: Vec<Frame>,
}

impl Sequence {
    /// Validate and wrap a list of frames.
    pub fn new(frames: Vec<Frame>) -> Result<Self, ModelError> {
        if frames.is_empty() {
            return Err(ModelError::InvalidSequence {
                message: "sequence has no frames".to_string(),
            });
        }
        if let Some(pos) = frames
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(ModelError::InvalidSequence {
                message: format!(
                    "timestamp goes backwards at frame {}: {}ms after {}ms",
                    pos + 1,
                    frames[pos + 1].timestamp,
                    frames[pos].timestamp
                ),
            });
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn timestamps(&self) -> Vec<TimestampMs> {
        self.frames.iter().map(|f| f.timestamp).collect()
    }

    /// Time between the first and last frame.
    pub fn duration_ms(&self) -> u64 {
        self.frames[self.last_index()].timestamp - self.frames[0].timestamp
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let frames = Vec::<Frame>::deserialize(deserializer)?;
        Sequence::new(frames).map_err(serde::de::Error::custom)
    }
}

/// A sequence together with the capture rate it was sampled at.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecording {
    pub sequence: Sequence,
    pub rate: CaptureRate,
}

/// On-disk shape of a recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordingDocument {
    Wrapped {
        #[serde(default)]
        fps: Option<f64>,
        #[serde(rename = "poseData")]
        pose_data: Vec<Frame>,
    },
    Bare(Vec<Frame>),
}

impl RecordingDocument {
    /// Validate into a recording, using `default_fps` when none is declared.
    pub fn into_recording(self, default_fps: f64) -> Result<PoseRecording, ModelError> {
        let (fps, frames) = match self {
            RecordingDocument::Wrapped { fps, pose_data } => (fps.unwrap_or(default_fps), pose_data),
            RecordingDocument::Bare(frames) => (default_fps, frames),
        };
        let rate = CaptureRate::new(fps).ok_or_else(|| ModelError::InvalidSequence {
            message: format!("capture rate must be positive, got {fps}"),
        })?;
        Ok(PoseRecording {
            sequence: Sequence::new(frames)?,
            rate,
        })
    }
}

impl PoseRecording {
    /// Parse a recording from JSON text.
    pub fn from_json(json: &str, default_fps: f64) -> Result<Self, ModelError> {
        let doc: RecordingDocument =
            serde_json::from_str(json).map_err(|e| ModelError::ParseError {
                path: PathBuf::from("<memory>"),
                source: e,
            })?;
        doc.into_recording(default_fps)
    }

    /// Load a recording from a JSON file.
    pub fn load(path: impl AsRef<Path>, default_fps: f64) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let doc: RecordingDocument =
            serde_json::from_str(&content).map_err(|e| ModelError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        let recording = doc.into_recording(default_fps)?;
        tracing::debug!(
            path = %path.display(),
            frames = recording.sequence.len(),
            fps = recording.rate.fps(),
            "Loaded pose recording"
        );
        Ok(recording)
    }

    /// Save the recording in the wrapped `{fps, poseData}` form.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let doc = RecordingDocument::Wrapped {
            fps: Some(self.rate.fps()),
            pose_data: self.sequence.frames().to_vec(),
        };
        let json = serde_json::to_string_pretty(&doc).map_err(|e| ModelError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when building or loading model data.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid sequence: {message}")]
    InvalidSequence { message: String },

    #[error("Invalid result id: {id:?}")]
    InvalidId { id: String },
}
