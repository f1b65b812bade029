//! SwingSync Pose Model
//!
//! Defines the core data contracts for swing analysis:
//! - **Keypoints:** Landmark positions with detector confidence
//! - **Frames/Sequences:** Timestamped keypoint sets for one recording
//! - **Analysis:** Key poses, metric sets, sync mappings, comparison reports
//! - **Store:** Persistence of analysis results keyed by id
//!
//! All coordinates are normalized to `[0.0, 1.0]` relative to the video
//! frame; timestamps are integer milliseconds.

pub mod analysis;
pub mod frame;
pub mod keypoint;
pub mod store;

pub use analysis::*;
pub use frame::*;
pub use keypoint::*;
pub use store::*;
