//! Clip entry builder.

use multicam_clip_model::{ClipEntry, ClipRecord, RecordError, TimelineSpan};
use multicam_common::error::{MulticamError, MulticamResult};
use multicam_timecode::TimecodeConverter;

use crate::template::ClipTemplate;
use crate::timeline::set;
use crate::xml::XmlElement;

/// Derive the entry for `record` and write it into a fresh copy of the
/// clip template.
pub fn build_clip_item(
    template: &ClipTemplate,
    record: &ClipRecord,
    span: &TimelineSpan,
    converter: &dyn TimecodeConverter,
) -> MulticamResult<XmlElement> {
    let entry = ClipEntry::derive(record, span, converter).map_err(|e| match e {
        RecordError::Timecode { source, .. } => MulticamError::timecode(
            record.camera_id(),
            record.id(),
            "timecode",
            format!("{:?}: {source}", record.timecode()),
        ),
        other => MulticamError::source(other.to_string()),
    })?;

    let mut item = template.instantiate();
    populate_clip_item(&mut item, &entry)?;
    tracing::trace!(
        camera = %record.camera_id(),
        record = %record.id(),
        start = entry.start,
        end = entry.end,
        "Built clip item"
    );
    Ok(item)
}

/// Write every field of `entry` into a `clipitem` element.
pub fn populate_clip_item(item: &mut XmlElement, entry: &ClipEntry) -> MulticamResult<()> {
    set(item, "name", entry.name.clone())?;
    set(item, "duration", entry.duration.to_string())?;
    set(item, "out", entry.out.to_string())?;
    set(item, "start", entry.start.to_string())?;
    set(item, "end", entry.end.to_string())?;
    set(item, "masterclipid", entry.master_clip_id.clone())?;

    item.require_mut("file")
        .map_err(|e| MulticamError::template(e.to_string()))?
        .set_attribute("id", entry.file_id.clone());
    set(item, "file/name", entry.file_name.clone())?;
    set(item, "file/pathurl", entry.path_url.clone())?;
    set(item, "file/duration", entry.duration.to_string())?;
    set(item, "file/timecode/string", entry.source_timecode.clone())?;
    set(item, "file/timecode/frame", entry.source_frame.to_string())?;
    set(item, "file/media/video/duration", entry.duration.to_string())?;
    Ok(())
}
