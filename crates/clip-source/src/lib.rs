//! Multicam Clip Sources
//!
//! The assembler reads clip records through the [`ClipSource`] trait:
//! - [`SqliteClipSource`]: one table of a SQLite database, one row per clip
//! - [`MemoryClipSource`]: an owned list of records (tests, embedding)

pub mod error;
pub mod memory;
pub mod sqlite;

use multicam_clip_model::{ClipRecord, FrameNumber, RecordKey};

pub use error::{SourceError, SourceResult};
pub use memory::MemoryClipSource;
pub use sqlite::{SqliteClipSource, CLIP_COLUMNS};

/// Queries the assembler needs from a collection of clip records.
pub trait ClipSource {
    /// Distinct camera identities, in the order the source yields them.
    fn camera_ids(&self) -> SourceResult<Vec<RecordKey>>;

    /// All records of one camera, ordered by first frame then id.
    fn clips_for_camera(&self, camera: &RecordKey) -> SourceResult<Vec<ClipRecord>>;

    /// The record with the smallest first frame; ties go to the lowest id.
    fn earliest_clip(&self) -> SourceResult<Option<ClipRecord>>;

    /// Largest last frame across all records.
    fn max_last_frame(&self) -> SourceResult<Option<FrameNumber>>;

    /// Number of records.
    fn record_count(&self) -> SourceResult<usize>;
}
