//! Track builder: one `track` element per camera.

use multicam_clip_model::{ClipRecord, RecordKey, TimelineSpan};
use multicam_common::error::{MulticamError, MulticamResult};

use crate::assembler::AssemblyContext;
use crate::clip::build_clip_item;
use crate::xml::XmlElement;

/// A populated `track` element and what went into it.
#[derive(Debug, Clone)]
pub struct BuiltTrack {
    pub camera: RecordKey,
    pub element: XmlElement,
    pub clip_count: usize,
    /// Consecutive clip pairs whose frame ranges overlap.
    pub overlaps: usize,
}

/// Build the track for `camera`, one clip item per record in frame order,
/// followed by the `enabled`/`locked` flags.
pub fn build_track(
    ctx: &AssemblyContext<'_>,
    camera: &RecordKey,
    span: &TimelineSpan,
) -> MulticamResult<BuiltTrack> {
    let clips = ctx
        .source
        .clips_for_camera(camera)
        .map_err(|e| MulticamError::source(e.to_string()))?;

    let overlaps = check_order(camera, &clips)?;

    let mut track = XmlElement::new("track");
    for record in &clips {
        track.push_child(build_clip_item(
            ctx.clip_template,
            record,
            span,
            ctx.converter,
        )?);
    }
    track.push_child(XmlElement::with_text("enabled", "TRUE"));
    track.push_child(XmlElement::with_text("locked", "FALSE"));

    tracing::debug!(camera = %camera, clips = clips.len(), overlaps, "Built track");
    Ok(BuiltTrack {
        camera: camera.clone(),
        element: track,
        clip_count: clips.len(),
        overlaps,
    })
}

/// Fail on records out of frame order and count overlapping neighbours.
fn check_order(camera: &RecordKey, clips: &[ClipRecord]) -> MulticamResult<usize> {
    let mut overlaps = 0;
    for pair in clips.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.timeline_order(prev).is_lt() {
            return Err(MulticamError::source(format!(
                "camera {camera}: record {} (frame {}) returned after record {} (frame {})",
                next.id(),
                next.first_frame(),
                prev.id(),
                prev.first_frame()
            )));
        }
        if next.first_frame() < prev.last_frame() {
            overlaps += 1;
            tracing::warn!(
                camera = %camera,
                previous = %prev.id(),
                next = %next.id(),
                previous_last = prev.last_frame(),
                next_first = next.first_frame(),
                "Overlapping clips on track"
            );
        }
    }
    Ok(overlaps)
}
