//! Show what the timeline would contain.

use serde::Serialize;

use multicam_clip_model::RecordKey;
use multicam_clip_source::ClipSource;
use multicam_common::config::AppConfig;
use multicam_common::error::MulticamError;
use multicam_timecode::Timecode;
use multicam_xml_export::map_timeline;

use super::Pipeline;

#[derive(Debug, Serialize)]
struct CameraInfo {
    camera: RecordKey,
    clips: usize,
}

#[derive(Debug, Serialize)]
struct TimelineInfo {
    database: String,
    table: String,
    framerate: String,
    clips: usize,
    cameras: Vec<CameraInfo>,
    origin_frame: i64,
    end_frame: i64,
    duration_frames: i64,
    duration_timecode: String,
    start_timecode: String,
}

pub fn run(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let info = collect(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Source: {} (table {})", info.database, info.table);
    println!("  Clips: {}", info.clips);
    println!("  Framerate: {}", info.framerate);
    println!();

    println!("Cameras:");
    for camera in &info.cameras {
        println!("  {}: {} clip(s)", camera.camera, camera.clips);
    }
    println!();

    println!("Timeline:");
    println!("  Origin frame: {}", info.origin_frame);
    println!("  End frame: {}", info.end_frame);
    println!(
        "  Duration: {} frames ({})",
        info.duration_frames, info.duration_timecode
    );
    println!("  Start timecode: {}", info.start_timecode);

    Ok(())
}

fn collect(config: &AppConfig) -> anyhow::Result<TimelineInfo> {
    let pipeline = Pipeline::open(config)?;
    let source = &pipeline.source;
    let span = map_timeline(source)?;

    let mut cameras = Vec::new();
    for camera in source
        .camera_ids()
        .map_err(|e| MulticamError::source(e.to_string()))?
    {
        let clips = source
            .clips_for_camera(&camera)
            .map_err(|e| MulticamError::source(e.to_string()))?
            .len();
        cameras.push(CameraInfo { camera, clips });
    }

    Ok(TimelineInfo {
        database: config.source.database.display().to_string(),
        table: config.source.table.clone(),
        framerate: pipeline.rate.to_string(),
        clips: source
            .record_count()
            .map_err(|e| MulticamError::source(e.to_string()))?,
        cameras,
        origin_frame: span.origin_frame,
        end_frame: span.end_frame,
        duration_frames: span.duration(),
        duration_timecode: Timecode::from_frame_number(span.duration(), pipeline.rate).to_string(),
        start_timecode: span.start_timecode,
    })
}
