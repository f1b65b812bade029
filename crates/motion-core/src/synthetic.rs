//! Deterministic synthetic forehand swings.
//!
//! Produces full 33-landmark recordings of a right-handed forehand: a
//! short ready stance, a wind-back that bends the elbow, a fast strike to
//! full extension, a slower follow-through across the body, and a settle.
//! Used for demos and as test fixtures where real pose captures are not
//! available.

use swingsync_common::clock::CaptureRate;
use swingsync_common::error::{SwingsyncError, SwingsyncResult};
use swingsync_pose_model::frame::{Frame, PoseRecording, Sequence};
use swingsync_pose_model::keypoint::*;

/// Dominant-arm pose at one instant of the script.
#[derive(Debug, Clone, Copy)]
struct ArmPose {
    elbow: (f64, f64),
    wrist: (f64, f64),
}

impl ArmPose {
    fn lerp(self, to: ArmPose, t: f64) -> ArmPose {
        let mix = |a: (f64, f64), b: (f64, f64)| (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
        ArmPose {
            elbow: mix(self.elbow, to.elbow),
            wrist: mix(self.wrist, to.wrist),
        }
    }
}

const READY: ArmPose = ArmPose {
    elbow: (0.60, 0.45),
    wrist: (0.66, 0.52),
};
const WOUND: ArmPose = ArmPose {
    elbow: (0.62, 0.42),
    wrist: (0.60, 0.34),
};
const EXTENDED: ArmPose = ArmPose {
    elbow: (0.68, 0.42),
    wrist: (0.82, 0.46),
};
const FINISHED: ArmPose = ArmPose {
    elbow: (0.64, 0.38),
    wrist: (0.70, 0.36),
};

/// Normalized-time boundaries of wind-back, strike and follow-through.
const WIND_START: f64 = 0.15;
const STRIKE_START: f64 = 0.45;
const FOLLOW_START: f64 = 0.65;
const SETTLE_START: f64 = 0.90;

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn stage(u: f64, start: f64, end: f64) -> f64 {
    smoothstep((u - start) / (end - start))
}

/// Parameters of a generated swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingScript {
    pub frames: usize,
    pub fps: f64,
    /// Added to every timestamp.
    pub time_shift_ms: u64,
    /// Exponent applied to normalized time. Above 1 delays the swing and
    /// shortens the strike, below 1 does the opposite.
    pub tempo_warp: f64,
}

impl Default for SwingScript {
    fn default() -> Self {
        Self {
            frames: 40,
            fps: 30.0,
            time_shift_ms: 0,
            tempo_warp: 1.0,
        }
    }
}

impl SwingScript {
    pub fn with_frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_time_shift(mut self, time_shift_ms: u64) -> Self {
        self.time_shift_ms = time_shift_ms;
        self
    }

    pub fn with_tempo_warp(mut self, tempo_warp: f64) -> Self {
        self.tempo_warp = tempo_warp;
        self
    }

    /// Render the swing into a validated recording.
    pub fn render(&self) -> SwingsyncResult<PoseRecording> {
        let rate = CaptureRate::new(self.fps).ok_or_else(|| {
            SwingsyncError::invalid_input(format!("capture rate must be positive, got {}", self.fps))
        })?;
        if !(self.tempo_warp.is_finite() && self.tempo_warp > 0.0) {
            return Err(SwingsyncError::invalid_input(format!(
                "tempo warp must be positive, got {}",
                self.tempo_warp
            )));
        }

        let frames = (0..self.frames)
            .map(|i| self.frame_at(i, rate))
            .collect::<Vec<_>>();
        let sequence =
            Sequence::new(frames).map_err(|e| SwingsyncError::invalid_input(e.to_string()))?;

        tracing::debug!(
            frames = self.frames,
            fps = self.fps,
            time_shift_ms = self.time_shift_ms,
            tempo_warp = self.tempo_warp,
            "Rendered synthetic swing"
        );
        Ok(PoseRecording { sequence, rate })
    }

    fn frame_at(&self, index: usize, rate: CaptureRate) -> Frame {
        let linear = if self.frames > 1 {
            index as f64 / (self.frames - 1) as f64
        } else {
            0.0
        };
        let u = linear.powf(self.tempo_warp);

        let arm = if u < STRIKE_START {
            READY.lerp(WOUND, stage(u, WIND_START, STRIKE_START))
        } else if u < FOLLOW_START {
            WOUND.lerp(EXTENDED, stage(u, STRIKE_START, FOLLOW_START))
        } else {
            EXTENDED.lerp(FINISHED, stage(u, FOLLOW_START, SETTLE_START))
        };

        // The trunk coils with the wind-back and unwinds through the strike.
        let coil = stage(u, WIND_START, STRIKE_START) - stage(u, STRIKE_START, FOLLOW_START);

        let mut keypoints = vec![Keypoint::hidden(); LANDMARK_COUNT];
        keypoints[NOSE] = Keypoint::new(0.50, 0.20, 0.90);
        keypoints[LEFT_SHOULDER] = Keypoint::new(0.45 + 0.03 * coil, 0.35, 0.95);
        keypoints[RIGHT_SHOULDER] = Keypoint::new(0.55, 0.37, 0.95);
        keypoints[LEFT_ELBOW] = Keypoint::new(0.42, 0.45, 0.90);
        keypoints[RIGHT_ELBOW] = Keypoint::new(arm.elbow.0, arm.elbow.1, 0.95);
        keypoints[LEFT_WRIST] = Keypoint::new(0.40, 0.55, 0.85);
        keypoints[RIGHT_WRIST] = Keypoint::new(arm.wrist.0, arm.wrist.1, 0.95);
        keypoints[LEFT_HIP] = Keypoint::new(0.46, 0.60, 0.90);
        keypoints[RIGHT_HIP] = Keypoint::new(0.54, 0.60, 0.90);
        keypoints[LEFT_KNEE] = Keypoint::new(0.45, 0.75, 0.85);
        keypoints[RIGHT_KNEE] = Keypoint::new(0.55, 0.75, 0.85);
        keypoints[LEFT_ANKLE] = Keypoint::new(0.44, 0.90, 0.80);
        keypoints[RIGHT_ANKLE] = Keypoint::new(0.56, 0.90, 0.80);

        Frame::new(self.time_shift_ms + rate.timestamp_at(index), keypoints)
    }
}

/// Default 40-frame swing at 30 fps.
pub fn forehand() -> SwingsyncResult<PoseRecording> {
    SwingScript::default().render()
}
