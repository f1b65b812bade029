//! End-to-end analysis of one recording, optionally against a reference.

use std::path::Path;

use swingsync_common::config::AnalysisConfig;
use swingsync_common::error::{SwingsyncError, SwingsyncResult};
use swingsync_pose_model::frame::{Frame, ModelError, PoseRecording, RecordingDocument};
use swingsync_pose_model::{AnalysisMeta, AnalysisResult};

use crate::align::TemporalAligner;
use crate::compare::compare;
use crate::metrics::MetricExtractor;
use crate::phases::PhaseDetector;
use crate::summary::classify_stroke;

/// Surface a pose-model error through the shared error type.
pub fn model_error(err: ModelError) -> SwingsyncError {
    match err {
        ModelError::IoError { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
            SwingsyncError::FileNotFound { path }
        }
        ModelError::IoError { source, .. } => SwingsyncError::Io(source),
        other => SwingsyncError::invalid_input(other.to_string()),
    }
}

/// Surface a result-store error through the shared error type.
pub fn store_error(err: ModelError) -> SwingsyncError {
    match err {
        ModelError::InvalidId { .. } => SwingsyncError::invalid_input(err.to_string()),
        other => SwingsyncError::storage(other.to_string()),
    }
}

/// Load and validate a recording file.
pub fn load_recording(path: impl AsRef<Path>, default_fps: f64) -> SwingsyncResult<PoseRecording> {
    PoseRecording::load(path, default_fps).map_err(model_error)
}

/// Runs metrics, phase detection, stroke summary and alignment.
#[derive(Debug, Clone)]
pub struct SwingAnalyzer {
    extractor: MetricExtractor,
    detector: PhaseDetector,
    aligner: TemporalAligner,
}

impl SwingAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let extractor = MetricExtractor::new(config.clone());
        Self {
            detector: PhaseDetector::from_extractor(extractor.clone()),
            aligner: TemporalAligner::new(config),
            extractor,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.extractor.config()
    }

    /// Analyze a single recording. `meta.analyzed_at` is left empty.
    pub fn analyze(&self, recording: &PoseRecording) -> AnalysisResult {
        let seq = &recording.sequence;
        let metrics = self.extractor.extract(seq);
        let key_poses = self.detector.detect(seq);
        let summary = classify_stroke(seq, self.config().visibility_threshold);
        let fallback = key_poses.is_empty();
        let frames_used = self.extractor.frames_used(seq);
        if frames_used < 2 {
            tracing::warn!(
                frames = seq.len(),
                frames_used,
                "Too few frames with a usable wrist for tempo or phases"
            );
        }

        tracing::info!(
            frames = seq.len(),
            key_poses = key_poses.len(),
            impacts = metrics.impact_frames.len(),
            fallback,
            "Analyzed recording"
        );

        AnalysisResult {
            summary,
            meta: AnalysisMeta {
                fps: recording.rate.fps(),
                sample_ms: recording.rate.interval_ms(),
                frames_used,
                analyzed_at: String::new(),
                fallback,
            },
            metrics,
            reference_metrics: None,
            comparison: None,
            key_poses,
            sync: None,
        }
    }

    /// Analyze a user recording and compare it against a reference.
    pub fn analyze_against(
        &self,
        user: &PoseRecording,
        reference: &PoseRecording,
        label: &str,
    ) -> AnalysisResult {
        let mut result = self.analyze(user);
        let reference_metrics = self.extractor.extract(&reference.sequence);
        let reference_poses = self.detector.detect(&reference.sequence);

        let sync = self.aligner.align_poses(
            &result.key_poses,
            user.sequence.len(),
            &reference_poses,
            reference.sequence.len(),
        );

        result.comparison = Some(compare(&result.metrics, &reference_metrics, label));
        result.reference_metrics = Some(reference_metrics);
        result.sync = Some(sync);
        result
    }

    /// Validate raw frames and analyze them.
    pub fn analyze_frames(&self, frames: Vec<Frame>, fps: f64) -> SwingsyncResult<AnalysisResult> {
        let recording = RecordingDocument::Wrapped {
            fps: Some(fps),
            pose_data: frames,
        }
        .into_recording(self.config().default_fps)
        .map_err(model_error)?;
        Ok(self.analyze(&recording))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{forehand, SwingScript};
    use swingsync_pose_model::{MappingStrategy, StrokeGuess};

    #[test]
    fn test_analyze_synthetic_forehand() {
        let recording = forehand().unwrap();
        let result = SwingAnalyzer::with_defaults().analyze(&recording);

        assert_eq!(result.key_poses.len(), 5);
        assert!(!result.meta.fallback);
        assert_eq!(result.meta.fps, 30.0);
        assert_eq!(result.meta.frames_used, 40);
        assert!(result.meta.analyzed_at.is_empty());
        assert_eq!(result.summary.stroke_guess, StrokeGuess::Forehand);
        assert!(result.metrics.elbow_angle_max > 150.0);
        assert!(result.metrics.shoulder_rotation_proxy > 0.0);
        assert!(result.comparison.is_none());
        assert!(result.reference_metrics.is_none());
    }

    #[test]
    fn test_analyze_against_itself() {
        let recording = forehand().unwrap();
        let result =
            SwingAnalyzer::with_defaults().analyze_against(&recording, &recording, "self");

        let comparison = result.comparison.unwrap();
        assert_eq!(comparison.elbow_angle_diff, 0.0);
        assert_eq!(comparison.shoulder_rotation_diff, 0.0);
        assert_eq!(comparison.impact_count_diff, 0);
        assert_eq!(comparison.reference_label, "self");

        let sync = result.sync.unwrap();
        assert_eq!(sync.offset_ms, 0.0);
        assert_eq!(sync.strategy, MappingStrategy::PhaseSegments);
        for m in &sync.mapping {
            assert_eq!(m.user_frame, m.reference_frame);
        }
    }

    #[test]
    fn test_shifted_reference_offset() {
        let user = forehand().unwrap();
        let reference = SwingScript::default().with_time_shift(400).render().unwrap();
        let result = SwingAnalyzer::with_defaults().analyze_against(&user, &reference, "shifted");
        assert_eq!(result.sync.unwrap().offset_ms, -400.0);
    }

    #[test]
    fn test_result_wire_shape() {
        let user = forehand().unwrap();
        let reference = SwingScript::default().with_tempo_warp(1.3).render().unwrap();
        let result = SwingAnalyzer::with_defaults().analyze_against(&user, &reference, "ref");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["keyPoses"].as_array().unwrap().len(), 5);
        assert_eq!(value["keyPoses"][0]["type"], "preparation");
        assert_eq!(value["sync"]["strategy"], "phase_segments");
        assert_eq!(value["sync"]["mapping"].as_array().unwrap().len(), 40);
        assert_eq!(value["comparison"]["referenceLabel"], "ref");
        assert_eq!(value["summary"]["strokeGuess"], "forehand");
    }

    #[test]
    fn test_static_recording_is_fallback() {
        let frames: Vec<Frame> = forehand()
            .unwrap()
            .sequence
            .frames()
            .iter()
            .take(1)
            .cloned()
            .collect();
        let result = SwingAnalyzer::with_defaults().analyze_frames(frames, 30.0).unwrap();
        assert!(result.meta.fallback);
        assert!(result.key_poses.is_empty());
        assert!(result.metrics.tempo_series.is_empty());
    }

    #[test]
    fn test_invalid_frames_are_invalid_input() {
        let err = SwingAnalyzer::with_defaults()
            .analyze_frames(vec![], 30.0)
            .unwrap_err();
        assert!(matches!(err, SwingsyncError::InvalidInput { .. }));

        let err = SwingAnalyzer::with_defaults()
            .analyze_frames(forehand().unwrap().sequence.into_frames(), -1.0)
            .unwrap_err();
        assert!(matches!(err, SwingsyncError::InvalidInput { .. }));
    }

    #[test]
    fn test_store_errors_map_to_storage_or_invalid_input() {
        let err = store_error(ModelError::IoError {
            path: "/results/abc.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(matches!(err, SwingsyncError::Storage { .. }));
        assert!(err.to_string().starts_with("Storage error: I/O error at /results/abc.json"));

        let err = store_error(ModelError::InvalidId { id: "../x".into() });
        assert!(matches!(err, SwingsyncError::InvalidInput { .. }));
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = load_recording("/nonexistent/swingsync/recording.json", 30.0).unwrap_err();
        assert!(matches!(err, SwingsyncError::FileNotFound { .. }));
    }
}
