//! Coarse stroke classification from shoulder-line tilt.

use swingsync_pose_model::frame::Sequence;
use swingsync_pose_model::keypoint::{LEFT_SHOULDER, RIGHT_SHOULDER};
use swingsync_pose_model::{StrokeGuess, StrokeSummary};

/// Mean tilt, in degrees, needed before a side is guessed.
const TILT_THRESHOLD_DEG: f64 = 5.0;

const GUESS_CONFIDENCE: f64 = 0.6;
const UNKNOWN_CONFIDENCE: f64 = 0.3;

/// Mean shoulder-line angle over frames with both shoulders usable.
pub fn mean_shoulder_tilt(seq: &Sequence, visibility_threshold: f64) -> Option<f64> {
    let angles: Vec<f64> = seq
        .frames()
        .iter()
        .filter_map(|frame| {
            let left = frame.usable(LEFT_SHOULDER, visibility_threshold)?;
            let right = frame.usable(RIGHT_SHOULDER, visibility_threshold)?;
            Some((right.y - left.y).atan2(right.x - left.x).to_degrees())
        })
        .collect();

    if angles.is_empty() {
        return None;
    }
    Some(angles.iter().sum::<f64>() / angles.len() as f64)
}

/// Guess forehand or backhand from the average shoulder tilt.
pub fn classify_stroke(seq: &Sequence, visibility_threshold: f64) -> StrokeSummary {
    match mean_shoulder_tilt(seq, visibility_threshold) {
        Some(tilt) if tilt > TILT_THRESHOLD_DEG => StrokeSummary {
            stroke_guess: StrokeGuess::Forehand,
            confidence: GUESS_CONFIDENCE,
        },
        Some(tilt) if tilt < -TILT_THRESHOLD_DEG => StrokeSummary {
            stroke_guess: StrokeGuess::Backhand,
            confidence: GUESS_CONFIDENCE,
        },
        _ => StrokeSummary {
            stroke_guess: StrokeGuess::Unknown,
            confidence: UNKNOWN_CONFIDENCE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swingsync_pose_model::frame::Frame;
    use swingsync_pose_model::keypoint::{Keypoint, LANDMARK_COUNT};

    fn shoulders(left: (f64, f64), right: (f64, f64), visibility: f64) -> Sequence {
        let frames = (0..4)
            .map(|i| {
                let mut keypoints = vec![Keypoint::hidden(); LANDMARK_COUNT];
                keypoints[LEFT_SHOULDER] = Keypoint::new(left.0, left.1, visibility);
                keypoints[RIGHT_SHOULDER] = Keypoint::new(right.0, right.1, visibility);
                Frame::new(i * 33, keypoints)
            })
            .collect();
        Sequence::new(frames).unwrap()
    }

    #[test]
    fn test_right_shoulder_lower_is_forehand() {
        let seq = shoulders((0.4, 0.30), (0.6, 0.36), 0.9);
        let summary = classify_stroke(&seq, 0.5);
        assert_eq!(summary.stroke_guess, StrokeGuess::Forehand);
        assert_eq!(summary.confidence, 0.6);
    }

    #[test]
    fn test_right_shoulder_higher_is_backhand() {
        let seq = shoulders((0.4, 0.36), (0.6, 0.30), 0.9);
        assert_eq!(classify_stroke(&seq, 0.5).stroke_guess, StrokeGuess::Backhand);
    }

    #[test]
    fn test_level_shoulders_are_unknown() {
        let seq = shoulders((0.4, 0.30), (0.6, 0.305), 0.9);
        let summary = classify_stroke(&seq, 0.5);
        assert_eq!(summary.stroke_guess, StrokeGuess::Unknown);
        assert_eq!(summary.confidence, 0.3);
    }

    #[test]
    fn test_hidden_shoulders_are_unknown() {
        let seq = shoulders((0.4, 0.30), (0.6, 0.40), 0.2);
        assert!(mean_shoulder_tilt(&seq, 0.5).is_none());
        assert_eq!(classify_stroke(&seq, 0.5).stroke_guess, StrokeGuess::Unknown);
    }
}
