//! In-memory clip source.

use multicam_clip_model::{ClipRecord, FrameNumber, RecordKey};

use crate::error::SourceResult;
use crate::ClipSource;

/// Clip records held in a `Vec`, in insertion order.
///
/// Camera identities are reported in first-seen order, mirroring how a
/// table scan yields them.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipSource {
    records: Vec<ClipRecord>,
}

impl MemoryClipSource {
    pub fn new(records: Vec<ClipRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<ClipRecord> for MemoryClipSource {
    fn from_iter<I: IntoIterator<Item = ClipRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ClipSource for MemoryClipSource {
    fn camera_ids(&self) -> SourceResult<Vec<RecordKey>> {
        let mut cameras: Vec<RecordKey> = Vec::new();
        for record in &self.records {
            if !cameras.contains(record.camera_id()) {
                cameras.push(record.camera_id().clone());
            }
        }
        Ok(cameras)
    }

    fn clips_for_camera(&self, camera: &RecordKey) -> SourceResult<Vec<ClipRecord>> {
        let mut clips: Vec<ClipRecord> = self
            .records
            .iter()
            .filter(|r| r.camera_id() == camera)
            .cloned()
            .collect();
        clips.sort_by(ClipRecord::timeline_order);
        Ok(clips)
    }

    fn earliest_clip(&self) -> SourceResult<Option<ClipRecord>> {
        Ok(self
            .records
            .iter()
            .min_by(|a, b| a.timeline_order(b))
            .cloned())
    }

    fn max_last_frame(&self) -> SourceResult<Option<FrameNumber>> {
        Ok(self.records.iter().map(ClipRecord::last_frame).max())
    }

    fn record_count(&self) -> SourceResult<usize> {
        Ok(self.records.len())
    }
}
