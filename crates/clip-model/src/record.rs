//! Clip records as read from the source table.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use multicam_timecode::TimecodeError;

/// Frame number on the global capture frame axis.
pub type FrameNumber = i64;

/// Identifier column value. SQLite tables store ids and camera ids as
/// either INTEGER or TEXT, so both are kept without coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordKey {
    Integer(i64),
    Text(String),
}

impl Ord for RecordKey {
    /// Integers order before text; within a kind the natural order applies.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Integer(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Integer(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RecordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RecordKey {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One recorded clip. Construction validates the frame range, the
/// duration and the file path, so every value of this type is usable by
/// the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipRecord {
    id: RecordKey,
    camera_id: RecordKey,
    timecode: String,
    duration: i64,
    first_frame: FrameNumber,
    last_frame: FrameNumber,
    file_path: String,
}

impl ClipRecord {
    pub fn new(
        id: impl Into<RecordKey>,
        camera_id: impl Into<RecordKey>,
        timecode: impl Into<String>,
        duration: i64,
        first_frame: FrameNumber,
        last_frame: FrameNumber,
        file_path: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let record = Self {
            id: id.into(),
            camera_id: camera_id.into(),
            timecode: timecode.into(),
            duration,
            first_frame,
            last_frame,
            file_path: file_path.into(),
        };

        if record.duration <= 0 {
            return Err(RecordError::invalid(
                &record.id,
                format!("duration must be positive, got {}", record.duration),
            ));
        }
        if record.last_frame <= record.first_frame {
            return Err(RecordError::invalid(
                &record.id,
                format!(
                    "last frame {} is not after first frame {}",
                    record.last_frame, record.first_frame
                ),
            ));
        }
        let ends_in_separator = record.file_path.ends_with(['/', std::path::MAIN_SEPARATOR]);
        if ends_in_separator || Path::new(&record.file_path).file_name().is_none() {
            return Err(RecordError::invalid(
                &record.id,
                format!("file path {:?} has no file name", record.file_path),
            ));
        }

        Ok(record)
    }

    pub fn id(&self) -> &RecordKey {
        &self.id
    }

    pub fn camera_id(&self) -> &RecordKey {
        &self.camera_id
    }

    /// Timecode of the clip's in-point at the recording's framerate.
    pub fn timecode(&self) -> &str {
        &self.timecode
    }

    /// Length in frames.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn first_frame(&self) -> FrameNumber {
        self.first_frame
    }

    pub fn last_frame(&self) -> FrameNumber {
        self.last_frame
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// File name including extension (`clip001.mov`).
    pub fn file_name(&self) -> &str {
        Path::new(&self.file_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// File name without its extension (`clip001`).
    pub fn clip_name(&self) -> &str {
        Path::new(&self.file_path)
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Order used within a track: first frame, then id.
    pub fn timeline_order(&self, other: &Self) -> Ordering {
        self.first_frame
            .cmp(&other.first_frame)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Errors raised while building or deriving from clip records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid clip record {id}: {reason}")]
    Invalid { id: String, reason: String },

    #[error("Clip record {id} starts at frame {first_frame}, before the timeline origin {origin_frame}")]
    BeforeOrigin {
        id: String,
        first_frame: FrameNumber,
        origin_frame: FrameNumber,
    },

    #[error("Clip record {id} has unusable timecode {timecode:?}: {source}")]
    Timecode {
        id: String,
        timecode: String,
        source: TimecodeError,
    },
}

impl RecordError {
    pub fn invalid(id: &RecordKey, reason: impl Into<String>) -> Self {
        Self::Invalid {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
