//! Align a user recording to a reference.

use std::path::PathBuf;

use swingsync_common::config::AppConfig;
use swingsync_motion_core::TemporalAligner;

use super::open_recording;

pub fn run(
    config: &AppConfig,
    user: PathBuf,
    reference: PathBuf,
    mapping: bool,
) -> anyhow::Result<()> {
    let user = open_recording(&user, config)?;
    let reference = open_recording(&reference, config)?;

    let sync = TemporalAligner::new(config.analysis.clone()).align(&user.sequence, &reference.sequence);

    println!("Offset: {:.1} ms", sync.offset_ms);
    println!("Strategy: {:?}", sync.strategy);
    println!("Segments: {}", sync.segments);

    if mapping {
        println!();
        println!("{:>6} -> {:<6}", "USER", "REF");
        for entry in &sync.mapping {
            println!("{:>6} -> {:<6}", entry.user_frame, entry.reference_frame);
        }
    }
    Ok(())
}
