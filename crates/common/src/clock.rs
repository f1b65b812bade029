//! Capture-rate and timestamp utilities.
//!
//! Pose recordings carry per-frame millisecond timestamps that are
//! monotonic but not necessarily evenly spaced. The declared capture rate
//! is only used to estimate a nominal frame interval, e.g. to flag gaps
//! where the pose detector dropped frames.

/// Nominal capture rate of a pose recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRate {
    fps: f64,
}

impl CaptureRate {
    /// Create a capture rate. Returns `None` for non-positive or non-finite rates.
    pub fn new(fps: f64) -> Option<Self> {
        (fps.is_finite() && fps > 0.0).then_some(Self { fps })
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Nominal interval between frames in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    /// Timestamp (ms) of the frame at `index`, truncated to whole milliseconds.
    pub fn timestamp_at(&self, index: usize) -> u64 {
        (index as f64 / self.fps * 1000.0).floor() as u64
    }

    /// Number of frames needed to cover `duration_ms`.
    pub fn frames_for_duration(&self, duration_ms: u64) -> usize {
        (duration_ms as f64 / self.interval_ms()).ceil() as usize
    }
}

/// Spacing irregularities found in a timestamp series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimestampAudit {
    /// Number of consecutive frame pairs sharing a timestamp.
    pub duplicates: usize,
    /// Number of consecutive frame pairs further apart than the gap tolerance.
    pub gaps: usize,
    /// Number of consecutive frame pairs whose timestamp goes backwards.
    pub regressions: usize,
    /// Largest delta between consecutive timestamps (ms).
    pub max_delta_ms: u64,
    /// Mean delta between consecutive timestamps (ms), 0 for fewer than two stamps.
    pub mean_delta_ms: f64,
}

impl TimestampAudit {
    /// Multiple of the nominal interval beyond which a delta counts as a gap.
    pub const GAP_TOLERANCE: f64 = 1.5;

    /// Whether the series is strictly increasing with no gaps.
    pub fn is_regular(&self) -> bool {
        self.duplicates == 0 && self.gaps == 0 && self.regressions == 0
    }
}

/// Audit the spacing of a timestamp series against a nominal capture rate.
pub fn audit_timestamps(timestamps: &[u64], rate: CaptureRate) -> TimestampAudit {
    let mut audit = TimestampAudit::default();
    if timestamps.len() < 2 {
        return audit;
    }

    let gap_limit = rate.interval_ms() * TimestampAudit::GAP_TOLERANCE;
    let mut total: u64 = 0;

    for pair in timestamps.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next < prev {
            audit.regressions += 1;
            continue;
        }
        let delta = next - prev;
        if delta == 0 {
            audit.duplicates += 1;
        } else if delta as f64 > gap_limit {
            audit.gaps += 1;
        }
        audit.max_delta_ms = audit.max_delta_ms.max(delta);
        total += delta;
    }

    audit.mean_delta_ms = total as f64 / (timestamps.len() - 1) as f64;
    audit
}
