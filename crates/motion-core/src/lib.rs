//! SwingSync Motion Core
//!
//! Analyzes keypoint sequences of a racquet swing:
//! - **Metrics:** Elbow angle, shoulder separation, wrist tempo, impacts
//! - **Phases:** Preparation, backswing peak, contact, follow-through, finish
//! - **Alignment:** Scalar time offset and phase-aware frame mapping
//! - **Comparison:** Metric differences against a reference recording
//! - **Pipeline:** One call from recording to stored-result contract
//! - **Synthetic:** Deterministic forehand recordings for demos and tests
//!
//! Apart from `pipeline::load_recording`, this crate is pure computation:
//! no I/O, no clocks, no shared state.
//! Identical inputs always produce identical outputs.

pub mod align;
pub mod compare;
pub mod metrics;
pub mod phases;
pub mod pipeline;
pub mod summary;
pub mod synthetic;

pub use align::TemporalAligner;
pub use metrics::MetricExtractor;
pub use phases::PhaseDetector;
pub use pipeline::SwingAnalyzer;
