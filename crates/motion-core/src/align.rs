//! Temporal alignment of a user swing against a reference swing.
//!
//! Two outputs are derived from the key poses of both recordings:
//!
//! - a **scalar offset** (weighted mean of per-phase timestamp differences)
//!   for simple synchronized playback, and
//! - a **frame mapping** that stretches each phase of the user recording
//!   onto the matching phase of the reference, so differing tempo in
//!   preparation or follow-through does not skew the comparison.
//!
//! The mapping is built from an ordered list of [`Segment`]s, one per pair
//! of consecutive phases present in both recordings.

use swingsync_common::config::AnalysisConfig;
use swingsync_pose_model::frame::Sequence;
use swingsync_pose_model::{
    find_pose, KeyPose, KeyPoseType, MappingStrategy, SyncMapping, SyncSummary,
};

use crate::phases::PhaseDetector;

/// Timestamp difference of one phase present in both recordings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseOffset {
    pub kind: KeyPoseType,
    /// `user.timestamp - reference.timestamp` in milliseconds.
    pub offset_ms: f64,
    pub weight: f64,
}

/// Weighted mean of per-phase offsets; 0 when there are none.
pub fn weighted_offset(offsets: &[PhaseOffset]) -> f64 {
    let total_weight: f64 = offsets.iter().map(|o| o.weight).sum();
    if offsets.is_empty() || total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = offsets.iter().map(|o| o.offset_ms * o.weight).sum();
    weighted_sum / total_weight
}

/// One phase-to-phase stretch of the mapping.
///
/// Covers the half-open user range `user_start..user_end`, mapped linearly
/// onto reference frames starting at `ref_start` and heading to `ref_end`.
/// The closing frame belongs to the next segment, or is pinned to
/// `ref_end` for the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: KeyPoseType,
    pub to: KeyPoseType,
    pub user_start: usize,
    pub user_end: usize,
    pub ref_start: usize,
    pub ref_end: usize,
}

impl Segment {
    /// Reference frame for a user frame inside this segment.
    fn reference_for(&self, user_frame: usize, ref_last: usize) -> usize {
        let user_len = self.user_end - self.user_start;
        let ref_len = self.ref_end - self.ref_start;
        let progress = if user_len > 0 {
            (user_frame - self.user_start) as f64 / user_len as f64
        } else {
            0.0
        };
        let target = self.ref_start + (progress * ref_len as f64).round() as usize;
        target.min(ref_last)
    }
}

/// Result of building a frame mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMapping {
    pub strategy: MappingStrategy,
    pub segments: Vec<Segment>,
    /// One entry per user frame, ordered by user frame.
    pub entries: Vec<SyncMapping>,
}

/// Proportional mapping of `user_len` frames onto `ref_len` frames.
pub fn linear_mapping(user_len: usize, ref_len: usize) -> Vec<SyncMapping> {
    let ref_last = ref_len.saturating_sub(1);
    (0..user_len)
        .map(|i| {
            let progress = if user_len > 1 {
                i as f64 / (user_len - 1) as f64
            } else {
                0.0
            };
            let reference = (progress * ref_last as f64).round() as usize;
            SyncMapping {
                user_frame: i,
                reference_frame: reference.min(ref_last),
            }
        })
        .collect()
}

/// Build the ordered segment list between consecutive canonical phases.
///
/// A pair of phases yields a segment only when both recordings have both
/// poses, the user span moves forward, the reference span does not move
/// backwards, and neither overlaps the previous segment. Pose indices
/// outside the sequences are ignored.
pub fn plan_segments(
    user_poses: &[KeyPose],
    user_len: usize,
    ref_poses: &[KeyPose],
    ref_len: usize,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for pair in KeyPoseType::CANONICAL.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let (Some(us), Some(ue), Some(rs), Some(re)) = (
            find_pose(user_poses, from),
            find_pose(user_poses, to),
            find_pose(ref_poses, from),
            find_pose(ref_poses, to),
        ) else {
            continue;
        };

        let segment = Segment {
            from,
            to,
            user_start: us.frame_index,
            user_end: ue.frame_index,
            ref_start: rs.frame_index,
            ref_end: re.frame_index,
        };

        let in_bounds = segment.user_end < user_len && segment.ref_end < ref_len;
        let ordered = segment.user_end > segment.user_start && segment.ref_end >= segment.ref_start;
        let follows = segments
            .last()
            .map_or(true, |prev| {
                segment.user_start >= prev.user_end && segment.ref_start >= prev.ref_end
            });

        if in_bounds && ordered && follows {
            segments.push(segment);
        } else {
            tracing::debug!(
                from = from.as_str(),
                to = to.as_str(),
                in_bounds,
                ordered,
                follows,
                "Skipping phase segment"
            );
        }
    }

    segments
}

/// Computes offsets and frame mappings between two recordings.
#[derive(Debug, Clone)]
pub struct TemporalAligner {
    contact_weight: f64,
    detector: PhaseDetector,
}

impl TemporalAligner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            contact_weight: config.contact_weight,
            detector: PhaseDetector::new(config),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    /// Per-phase offsets for every phase present in both pose lists.
    pub fn phase_offsets(&self, user_poses: &[KeyPose], ref_poses: &[KeyPose]) -> Vec<PhaseOffset> {
        KeyPoseType::CANONICAL
            .iter()
            .filter_map(|&kind| {
                let user = find_pose(user_poses, kind)?;
                let reference = find_pose(ref_poses, kind)?;
                let weight = if kind == KeyPoseType::BallContact {
                    self.contact_weight
                } else {
                    1.0
                };
                Some(PhaseOffset {
                    kind,
                    offset_ms: user.timestamp as f64 - reference.timestamp as f64,
                    weight,
                })
            })
            .collect()
    }

    /// Scalar offset in milliseconds.
    ///
    /// Positive means the reference should be shifted later to line up
    /// with the user recording. 0 when no phase matches.
    pub fn time_offset(&self, user_poses: &[KeyPose], ref_poses: &[KeyPose]) -> f64 {
        let offsets = self.phase_offsets(user_poses, ref_poses);
        if offsets.is_empty() {
            tracing::info!("No key poses matched between recordings, using zero offset");
            return 0.0;
        }
        let offset = weighted_offset(&offsets);
        tracing::debug!(?offsets, offset_ms = offset, "Computed weighted time offset");
        offset
    }

    /// Map every user frame index to one reference frame index.
    ///
    /// Falls back to a proportional mapping when either recording has no
    /// key poses or no phase segment can be matched.
    pub fn frame_mapping(
        &self,
        user_poses: &[KeyPose],
        user_len: usize,
        ref_poses: &[KeyPose],
        ref_len: usize,
    ) -> FrameMapping {
        let linear = || FrameMapping {
            strategy: MappingStrategy::Linear,
            segments: vec![],
            entries: linear_mapping(user_len, ref_len),
        };

        if user_len == 0 || ref_len == 0 {
            return linear();
        }
        if user_poses.is_empty() || ref_poses.is_empty() {
            tracing::info!("Key poses missing, falling back to linear frame mapping");
            return linear();
        }

        let segments = plan_segments(user_poses, user_len, ref_poses, ref_len);
        if segments.is_empty() {
            tracing::info!("No matching phase segments, falling back to linear frame mapping");
            return linear();
        }

        let ref_last = ref_len - 1;
        let mut slots: Vec<Option<usize>> = vec![None; user_len];
        for segment in &segments {
            for user_frame in segment.user_start..segment.user_end {
                slots[user_frame] = Some(segment.reference_for(user_frame, ref_last));
            }
        }
        let mut last_covered = 0;
        let mut hold = 0;
        if let Some(last) = segments.last() {
            slots[last.user_end] = Some(last.ref_end.min(ref_last));
            last_covered = last.user_end;
            hold = (last.ref_end + 1).min(ref_last);
        }

        // Leading frames wait at the reference start and gaps hold the last
        // mapped frame. Trailing frames step one reference frame past the
        // last segment and stay there.
        let mut entries = Vec::with_capacity(user_len);
        let mut previous: Option<usize> = None;
        for (user_frame, slot) in slots.into_iter().enumerate() {
            let reference_frame = match (slot, previous) {
                (Some(r), _) => r,
                (None, None) => 0,
                (None, Some(_)) if user_frame > last_covered => hold,
                (None, Some(prev)) => prev,
            };
            previous = Some(reference_frame);
            entries.push(SyncMapping {
                user_frame,
                reference_frame,
            });
        }

        FrameMapping {
            strategy: MappingStrategy::PhaseSegments,
            segments,
            entries,
        }
    }

    /// Detect phases in both sequences and align them.
    pub fn align(&self, user: &Sequence, reference: &Sequence) -> SyncSummary {
        let user_poses = self.detector.detect(user);
        let ref_poses = self.detector.detect(reference);
        self.align_poses(&user_poses, user.len(), &ref_poses, reference.len())
    }

    /// Align from already detected key poses.
    pub fn align_poses(
        &self,
        user_poses: &[KeyPose],
        user_len: usize,
        ref_poses: &[KeyPose],
        ref_len: usize,
    ) -> SyncSummary {
        let offset_ms = self.time_offset(user_poses, ref_poses);
        let mapping = self.frame_mapping(user_poses, user_len, ref_poses, ref_len);
        SyncSummary {
            offset_ms,
            strategy: mapping.strategy,
            segments: mapping.segments.len(),
            mapping: mapping.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(kind: KeyPoseType, frame_index: usize, timestamp: u64) -> KeyPose {
        KeyPose {
            frame_index,
            kind,
            timestamp,
            confidence: kind.confidence(),
        }
    }

    fn refs(entries: &[SyncMapping]) -> Vec<usize> {
        entries.iter().map(|m| m.reference_frame).collect()
    }

    #[test]
    fn test_weighted_offset_scenario() {
        let offsets = [
            PhaseOffset {
                kind: KeyPoseType::BallContact,
                offset_ms: 200.0,
                weight: 3.0,
            },
            PhaseOffset {
                kind: KeyPoseType::Finish,
                offset_ms: -100.0,
                weight: 1.0,
            },
        ];
        assert_eq!(weighted_offset(&offsets), 125.0);
        assert_eq!(weighted_offset(&[]), 0.0);
    }

    #[test]
    fn test_time_offset_from_poses() {
        let aligner = TemporalAligner::with_defaults();
        let user = [
            pose(KeyPoseType::BallContact, 10, 700),
            pose(KeyPoseType::Finish, 20, 1000),
        ];
        let reference = [
            pose(KeyPoseType::BallContact, 8, 500),
            pose(KeyPoseType::Finish, 25, 1100),
        ];
        assert_eq!(aligner.time_offset(&user, &reference), 125.0);
    }

    #[test]
    fn test_time_offset_without_matches_is_zero() {
        let aligner = TemporalAligner::with_defaults();
        let user = [pose(KeyPoseType::Preparation, 0, 0)];
        let reference = [pose(KeyPoseType::FollowThrough, 5, 500)];
        assert_eq!(aligner.time_offset(&user, &reference), 0.0);
        assert_eq!(aligner.time_offset(&[], &[]), 0.0);
    }

    #[test]
    fn test_linear_mapping_identity_for_equal_lengths() {
        let mapping = linear_mapping(7, 7);
        for (i, m) in mapping.iter().enumerate() {
            assert_eq!(m.user_frame, i);
            assert_eq!(m.reference_frame, i);
        }
    }

    #[test]
    fn test_linear_mapping_stretches() {
        assert_eq!(refs(&linear_mapping(3, 5)), vec![0, 2, 4]);
        assert_eq!(refs(&linear_mapping(5, 3)), vec![0, 1, 1, 2, 2]);
        assert_eq!(refs(&linear_mapping(1, 9)), vec![0]);
    }

    #[test]
    fn test_mapping_falls_back_without_poses() {
        let aligner = TemporalAligner::with_defaults();
        let mapping = aligner.frame_mapping(&[], 4, &[pose(KeyPoseType::Finish, 3, 90)], 4);
        assert_eq!(mapping.strategy, MappingStrategy::Linear);
        assert_eq!(refs(&mapping.entries), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_piecewise_mapping_per_phase() {
        let aligner = TemporalAligner::with_defaults();
        // User: long preparation, short follow-through. Reference: the opposite.
        let user = [
            pose(KeyPoseType::BackswingPeak, 2, 0),
            pose(KeyPoseType::BallContact, 6, 0),
            pose(KeyPoseType::FollowThrough, 8, 0),
            pose(KeyPoseType::Finish, 9, 0),
        ];
        let reference = [
            pose(KeyPoseType::BackswingPeak, 1, 0),
            pose(KeyPoseType::BallContact, 3, 0),
            pose(KeyPoseType::FollowThrough, 7, 0),
            pose(KeyPoseType::Finish, 9, 0),
        ];
        let mapping = aligner.frame_mapping(&user, 10, &reference, 10);
        assert_eq!(mapping.strategy, MappingStrategy::PhaseSegments);
        assert_eq!(mapping.segments.len(), 3);
        // 0,1 precede the first segment; 2..=6 stretch onto 1..=3;
        // 6..=8 onto 3..=7; 8..=9 onto 7..=9.
        assert_eq!(refs(&mapping.entries), vec![0, 0, 1, 2, 2, 3, 3, 5, 7, 9]);
    }

    #[test]
    fn test_trailing_frames_hold_after_last_segment() {
        let aligner = TemporalAligner::with_defaults();
        let user = [
            pose(KeyPoseType::BackswingPeak, 1, 0),
            pose(KeyPoseType::BallContact, 3, 0),
            pose(KeyPoseType::Finish, 7, 0),
        ];
        let reference = [
            pose(KeyPoseType::BackswingPeak, 2, 0),
            pose(KeyPoseType::BallContact, 4, 0),
            pose(KeyPoseType::FollowThrough, 5, 0),
            pose(KeyPoseType::Finish, 6, 0),
        ];
        let mapping = aligner.frame_mapping(&user, 8, &reference, 7);
        assert_eq!(mapping.segments.len(), 1);
        assert_eq!(refs(&mapping.entries), vec![0, 2, 3, 4, 5, 5, 5, 5]);
    }

    #[test]
    fn test_long_tail_does_not_drift_through_reference() {
        let aligner = TemporalAligner::with_defaults();
        let user = [
            pose(KeyPoseType::BackswingPeak, 1, 0),
            pose(KeyPoseType::BallContact, 3, 0),
            pose(KeyPoseType::Finish, 9, 0),
        ];
        let reference = [
            pose(KeyPoseType::BackswingPeak, 2, 0),
            pose(KeyPoseType::BallContact, 4, 0),
            pose(KeyPoseType::FollowThrough, 5, 0),
            pose(KeyPoseType::Finish, 19, 0),
        ];
        let mapping = aligner.frame_mapping(&user, 10, &reference, 20);
        assert_eq!(mapping.segments.len(), 1);
        assert_eq!(refs(&mapping.entries), vec![0, 2, 3, 4, 5, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_trailing_hold_is_clamped_to_reference_end() {
        let aligner = TemporalAligner::with_defaults();
        let user = [
            pose(KeyPoseType::BackswingPeak, 0, 0),
            pose(KeyPoseType::BallContact, 2, 0),
        ];
        let reference = [
            pose(KeyPoseType::BackswingPeak, 1, 0),
            pose(KeyPoseType::BallContact, 3, 0),
        ];
        let mapping = aligner.frame_mapping(&user, 5, &reference, 4);
        assert_eq!(refs(&mapping.entries), vec![1, 2, 3, 3, 3]);
    }

    #[test]
    fn test_inverted_segment_is_skipped() {
        let aligner = TemporalAligner::with_defaults();
        // User preparation comes after the backswing peak.
        let user = [
            pose(KeyPoseType::BackswingPeak, 1, 0),
            pose(KeyPoseType::Preparation, 2, 0),
            pose(KeyPoseType::BallContact, 4, 0),
            pose(KeyPoseType::Finish, 5, 0),
        ];
        let reference = [
            pose(KeyPoseType::Preparation, 0, 0),
            pose(KeyPoseType::BackswingPeak, 2, 0),
            pose(KeyPoseType::BallContact, 4, 0),
            pose(KeyPoseType::Finish, 5, 0),
        ];
        let mapping = aligner.frame_mapping(&user, 6, &reference, 6);
        assert_eq!(mapping.segments.len(), 1);
        assert_eq!(mapping.segments[0].from, KeyPoseType::BackswingPeak);
        assert_eq!(mapping.entries.len(), 6);
        for pair in mapping.entries.windows(2) {
            assert!(pair[0].reference_frame <= pair[1].reference_frame);
        }
    }

    #[test]
    fn test_no_segment_falls_back_to_linear() {
        let aligner = TemporalAligner::with_defaults();
        let user = [pose(KeyPoseType::BallContact, 2, 0), pose(KeyPoseType::Finish, 4, 0)];
        let reference = [pose(KeyPoseType::Finish, 4, 0)];
        let mapping = aligner.frame_mapping(&user, 5, &reference, 5);
        assert_eq!(mapping.strategy, MappingStrategy::Linear);
        assert_eq!(refs(&mapping.entries), vec![0, 1, 2, 3, 4]);
    }
}
