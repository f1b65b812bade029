//! Write a synthetic user/reference recording pair.

use std::path::PathBuf;

use swingsync_motion_core::synthetic::SwingScript;

pub fn run(output: PathBuf, frames: usize, fps: f64, reference_warp: f64) -> anyhow::Result<()> {
    std::fs::create_dir_all(&output)?;

    let base = SwingScript::default().with_frames(frames).with_fps(fps);
    let pairs = [
        ("forehand-user.json", base),
        ("forehand-reference.json", base.with_tempo_warp(reference_warp)),
    ];

    for (name, script) in pairs {
        let recording = script.render()?;
        let path = output.join(name);
        recording
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        println!(
            "Wrote {} ({} frames @ {}fps)",
            path.display(),
            recording.sequence.len(),
            fps
        );
    }

    println!(
        "\nTry: swingsync analyze {} --reference {}",
        output.join("forehand-user.json").display(),
        output.join("forehand-reference.json").display()
    );
    Ok(())
}
