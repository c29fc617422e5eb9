//! The global frame axis of one timeline.

use serde::Serialize;

use crate::record::{ClipRecord, FrameNumber, RecordError, RecordKey};

/// Frame origin, end and header timecode of a timeline.
///
/// All clip offsets are relative to `origin_frame`, which is the smallest
/// `first_frame` of any record, so offsets are never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineSpan {
    /// Smallest `first_frame` across all records.
    pub origin_frame: FrameNumber,

    /// Largest `last_frame` across all records.
    pub end_frame: FrameNumber,

    /// Id of the earliest record (lowest id among equal first frames).
    pub start_record: RecordKey,

    /// Timecode of the earliest record.
    pub start_timecode: String,

    /// `first_frame` of the earliest record, on the converter's one-based axis.
    pub start_frame: FrameNumber,
}

impl TimelineSpan {
    /// Build the span from the earliest record and the largest last frame.
    pub fn new(earliest: &ClipRecord, end_frame: FrameNumber) -> Result<Self, RecordError> {
        if end_frame <= earliest.first_frame() {
            return Err(RecordError::invalid(
                earliest.id(),
                format!(
                    "timeline end frame {end_frame} is not after origin {}",
                    earliest.first_frame()
                ),
            ));
        }
        Ok(Self {
            origin_frame: earliest.first_frame(),
            end_frame,
            start_record: earliest.id().clone(),
            start_timecode: earliest.timecode().to_string(),
            start_frame: earliest.first_frame(),
        })
    }

    /// Sequence length in frames.
    pub fn duration(&self) -> i64 {
        self.end_frame - self.origin_frame
    }

    /// Frame written to the sequence header timecode. The converter counts
    /// frames from one, the header counts from zero.
    pub fn header_frame(&self) -> FrameNumber {
        self.start_frame - 1
    }

    /// Offset of an absolute frame from the origin.
    pub fn offset(&self, frame: FrameNumber) -> i64 {
        frame - self.origin_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, cam: &str, first: i64, last: i64) -> ClipRecord {
        ClipRecord::new(
            id,
            cam,
            format!("00:00:{:02}:00", id % 60),
            last - first,
            first,
            last,
            format!("/media/{cam}/clip{id:03}.mov"),
        )
        .unwrap()
    }

    fn span_of(records: &[ClipRecord]) -> TimelineSpan {
        let earliest = records.iter().min_by(|a, b| a.timeline_order(b)).unwrap();
        let end = records.iter().map(ClipRecord::last_frame).max().unwrap();
        TimelineSpan::new(earliest, end).unwrap()
    }

    #[test]
    fn test_two_camera_scenario() {
        let records = vec![
            rec(1, "A", 100, 160),
            rec(2, "A", 200, 260),
            rec(3, "B", 150, 210),
        ];
        let span = span_of(&records);
        assert_eq!(span.origin_frame, 100);
        assert_eq!(span.end_frame, 260);
        assert_eq!(span.duration(), 160);
        assert_eq!(span.start_record, RecordKey::Integer(1));
        assert_eq!(span.start_timecode, "00:00:01:00");
        assert_eq!(span.header_frame(), 99);
        assert_eq!(span.offset(150), 50);
    }

    #[test]
    fn test_end_not_after_origin_is_rejected() {
        let first = rec(1, "A", 100, 160);
        let err = TimelineSpan::new(&first, 100).unwrap_err();
        assert!(matches!(err, RecordError::Invalid { .. }));
    }

    #[test]
    fn test_earliest_tie_broken_by_lowest_id() {
        let records = vec![rec(9, "A", 100, 120), rec(4, "B", 100, 130), rec(5, "C", 100, 110)];
        let span = span_of(&records);
        assert_eq!(span.start_record, RecordKey::Integer(4));
        assert_eq!(span.start_timecode, "00:00:04:00");
    }

    proptest::proptest! {
        #[test]
        fn prop_span_matches_min_and_max(
            ranges in proptest::collection::vec((0i64..1_000_000, 1i64..10_000), 1..50)
        ) {
            let records: Vec<ClipRecord> = ranges
                .iter()
                .enumerate()
                .map(|(i, (first, len))| rec(i as i64, "A", *first, first + len))
                .collect();
            let span = span_of(&records);

            let min_first = records.iter().map(ClipRecord::first_frame).min().unwrap();
            let max_last = records.iter().map(ClipRecord::last_frame).max().unwrap();
            proptest::prop_assert_eq!(span.origin_frame, min_first);
            proptest::prop_assert_eq!(span.duration(), max_last - min_first);
            for record in &records {
                proptest::prop_assert!(span.offset(record.first_frame()) >= 0);
            }
        }
    }
}
