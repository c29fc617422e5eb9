//! Derived fields of one clip placed on the timeline.

use serde::Serialize;

use multicam_timecode::TimecodeConverter;

use crate::record::{ClipRecord, FrameNumber, RecordError};
use crate::span::TimelineSpan;

/// Prefix turning an absolute path into the `pathurl` editors expect.
pub const PATH_URL_PREFIX: &str = "file://localhost";

/// Suffix appended to the clip name to form the `file` element id.
pub const FILE_ID_SUFFIX: &str = " 2";

/// Every value written into one `clipitem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipEntry {
    /// File name without extension.
    pub name: String,

    /// File name with extension.
    pub file_name: String,

    /// Length in frames, copied from the record.
    pub duration: i64,

    /// Out point. Clips are placed untrimmed, so this equals `duration`.
    pub out: i64,

    /// Timeline position of the first frame, relative to the origin.
    pub start: i64,

    /// Timeline position of the last frame, relative to the origin.
    pub end: i64,

    /// `"<name> <id>"`.
    pub master_clip_id: String,

    /// `id` attribute of the `file` element.
    pub file_id: String,

    /// `file://localhost` followed by the record's path.
    pub path_url: String,

    /// Timecode of the clip's in-point.
    pub source_timecode: String,

    /// Zero-based frame of `source_timecode`.
    pub source_frame: FrameNumber,
}

impl ClipEntry {
    /// Derive the entry for `record` on the timeline described by `span`.
    pub fn derive(
        record: &ClipRecord,
        span: &TimelineSpan,
        converter: &dyn TimecodeConverter,
    ) -> Result<Self, RecordError> {
        if record.first_frame() < span.origin_frame {
            return Err(RecordError::BeforeOrigin {
                id: record.id().to_string(),
                first_frame: record.first_frame(),
                origin_frame: span.origin_frame,
            });
        }

        let frames = converter
            .frames(record.timecode())
            .map_err(|source| RecordError::Timecode {
                id: record.id().to_string(),
                timecode: record.timecode().to_string(),
                source,
            })?;

        let name = record.clip_name().to_string();
        Ok(Self {
            file_name: record.file_name().to_string(),
            duration: record.duration(),
            out: record.duration(),
            start: span.offset(record.first_frame()),
            end: span.offset(record.last_frame()),
            master_clip_id: format!("{name} {}", record.id()),
            file_id: format!("{name}{FILE_ID_SUFFIX}"),
            path_url: format!("{PATH_URL_PREFIX}{}", record.file_path()),
            source_timecode: record.timecode().to_string(),
            source_frame: frames - 1,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multicam_timecode::{FrameRate, SmpteConverter};

    fn pal() -> SmpteConverter {
        SmpteConverter::new(FrameRate::Integer(25))
    }

    fn span_at(origin: i64) -> TimelineSpan {
        let first = ClipRecord::new(0, "A", "00:00:00:00", 10, origin, origin + 10, "/x.mov")
            .unwrap();
        TimelineSpan::new(&first, origin + 1000).unwrap()
    }

    #[test]
    fn test_derive_fields_from_path_and_frames() {
        let record = ClipRecord::new(
            12,
            "cam1",
            "01:00:00:00",
            60,
            250,
            310,
            "/media/cam1/clip001.mov",
        )
        .unwrap();
        let entry = ClipEntry::derive(&record, &span_at(100), &pal()).unwrap();

        assert_eq!(entry.name, "clip001");
        assert_eq!(entry.file_name, "clip001.mov");
        assert_eq!(entry.path_url, "file://localhost/media/cam1/clip001.mov");
        assert_eq!(entry.start, 150);
        assert_eq!(entry.end, 210);
        assert_eq!(entry.duration, 60);
        assert_eq!(entry.out, 60);
        assert_eq!(entry.master_clip_id, "clip001 12");
        assert_eq!(entry.file_id, "clip001 2");
        assert_eq!(entry.source_timecode, "01:00:00:00");
    }

    #[test]
    fn test_source_frame_is_converter_frames_minus_one() {
        let record =
            ClipRecord::new(1, 1, "01:00:00:00", 10, 100, 110, "/media/a.mov").unwrap();
        let entry = ClipEntry::derive(&record, &span_at(100), &pal()).unwrap();
        assert_eq!(pal().frames("01:00:00:00").unwrap(), 90_001);
        assert_eq!(entry.source_frame, 90_000);
    }

    #[test]
    fn test_bad_timecode_names_the_record() {
        let record = ClipRecord::new(5, 1, "1:00", 10, 100, 110, "/media/a.mov").unwrap();
        let err = ClipEntry::derive(&record, &span_at(100), &pal()).unwrap_err();
        match err {
            RecordError::Timecode { id, timecode, .. } => {
                assert_eq!(id, "5");
                assert_eq!(timecode, "1:00");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_before_origin_is_rejected() {
        let record = ClipRecord::new(5, 1, "00:00:00:00", 10, 90, 100, "/a.mov").unwrap();
        let err = ClipEntry::derive(&record, &span_at(100), &pal()).unwrap_err();
        assert!(matches!(err, RecordError::BeforeOrigin { origin_frame: 100, .. }));
    }
}
