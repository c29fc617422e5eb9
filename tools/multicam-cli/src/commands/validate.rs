//! Build every clip entry without writing the timeline.

use multicam_common::config::AppConfig;
use multicam_xml_export::RunId;

use super::Pipeline;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!(
        "Validating {} (table {})",
        config.source.database.display(),
        config.source.table
    );

    let pipeline = Pipeline::open(config)?;
    println!("  Templates: OK");

    let assembly = pipeline.context().assemble(RunId::generate())?;
    let report = &assembly.report;
    println!(
        "  Clips: {} across {} camera(s)",
        report.clip_count(),
        report.tracks.len()
    );
    println!("  Timeline: {} frames", report.span.duration());

    if report.overlap_count() == 0 {
        println!("\nAll clips are valid.");
    } else {
        println!(
            "\nAll clips are valid; {} overlapping clip pair(s) will be kept as recorded.",
            report.overlap_count()
        );
    }
    Ok(())
}
