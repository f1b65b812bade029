//! Keypoints and the full-body landmark scheme.
//!
//! Frames follow the standard 33-point full-body pose topology. Only the
//! limb landmarks below are used by the analysis; the rest are carried
//! through untouched.

use serde::{Deserialize, Serialize};
use swingsync_common::config::Side;

/// Number of landmarks in a full-body frame.
pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Skeleton edges between logically adjacent landmarks.
///
/// For rendering and inspection only; no metric reads this.
pub const SKELETON_EDGES: [(usize, usize); 12] = [
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_SHOULDER, LEFT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP),
    (LEFT_HIP, RIGHT_HIP),
    (LEFT_HIP, LEFT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_HIP, RIGHT_KNEE),
    (RIGHT_KNEE, RIGHT_ANKLE),
];

/// A single tracked body point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0].
    pub y: f64,
    /// Detector confidence [0.0, 1.0]. Missing values count as unseen.
    #[serde(default)]
    pub visibility: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    /// A keypoint the detector did not see.
    pub fn hidden() -> Self {
        Self::new(0.5, 0.5, 0.0)
    }

    /// Whether the detector confidence is strictly above `threshold`.
    pub fn is_usable(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    /// Euclidean distance in normalized frame units.
    pub fn distance_to(&self, other: &Keypoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Landmark indices of one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmLandmarks {
    pub shoulder: usize,
    pub elbow: usize,
    pub wrist: usize,
}

impl ArmLandmarks {
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Left => Self {
                shoulder: LEFT_SHOULDER,
                elbow: LEFT_ELBOW,
                wrist: LEFT_WRIST,
            },
            Side::Right => Self {
                shoulder: RIGHT_SHOULDER,
                elbow: RIGHT_ELBOW,
                wrist: RIGHT_WRIST,
            },
        }
    }
}

/// Human-readable name of a landmark used by the analysis, if any.
pub fn landmark_name(index: usize) -> Option<&'static str> {
    let name = match index {
        NOSE => "nose",
        LEFT_SHOULDER => "left_shoulder",
        RIGHT_SHOULDER => "right_shoulder",
        LEFT_ELBOW => "left_elbow",
        RIGHT_ELBOW => "right_elbow",
        LEFT_WRIST => "left_wrist",
        RIGHT_WRIST => "right_wrist",
        LEFT_HIP => "left_hip",
        RIGHT_HIP => "right_hip",
        LEFT_KNEE => "left_knee",
        RIGHT_KNEE => "right_knee",
        LEFT_ANKLE => "left_ankle",
        RIGHT_ANKLE => "right_ankle",
        _ => return None,
    };
    Some(name)
}
