//! Assemble the timeline and write it.

use multicam_common::config::AppConfig;

use super::Pipeline;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let pipeline = Pipeline::open(config)?;
    let report = pipeline.context().generate(&config.output)?;

    println!("Timeline written: {}", config.output.display());
    println!("  Run: {}", report.run_id);
    println!("  Framerate: {}", report.frame_rate);
    println!(
        "  Span: frames {}..{} ({} frames)",
        report.span.origin_frame,
        report.span.end_frame,
        report.span.duration()
    );
    println!("  Tracks:");
    for track in &report.tracks {
        println!("    camera {}: {} clip(s)", track.camera, track.clips);
    }
    if report.overlap_count() > 0 {
        println!(
            "\n{} overlapping clip pair(s) kept as recorded.",
            report.overlap_count()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{config_for, write_clip_db};

    #[test]
    fn test_generate_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        write_clip_db(&config.source.database);

        run(&config).unwrap();
        let xml = std::fs::read_to_string(&config.output).unwrap();
        assert!(xml.contains("<clipitem>"));
        assert!(xml.contains("<masterclipid>c 3</masterclipid>"));
    }

    #[test]
    fn test_missing_database_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        assert!(run(&config).is_err());
        assert!(!config.output.exists());
    }
}
