//! Timeline frame mapper: the global frame axis and the sequence header.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use multicam_clip_model::TimelineSpan;
use multicam_clip_source::ClipSource;
use multicam_common::error::{MulticamError, MulticamResult};

use crate::xml::XmlElement;

/// Identifier written to `sequence/uuid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Use a fixed identifier, e.g. for reproducible output.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute origin, end and start timecode from the whole source.
///
/// Fails with [`MulticamError::EmptySource`] when there are no records.
pub fn map_timeline(source: &dyn ClipSource) -> MulticamResult<TimelineSpan> {
    let earliest = source
        .earliest_clip()
        .map_err(|e| MulticamError::source(e.to_string()))?
        .ok_or(MulticamError::EmptySource)?;
    let end_frame = source
        .max_last_frame()
        .map_err(|e| MulticamError::source(e.to_string()))?
        .ok_or(MulticamError::EmptySource)?;

    let span = TimelineSpan::new(&earliest, end_frame)
        .map_err(|e| MulticamError::source(e.to_string()))?;

    tracing::debug!(
        origin = span.origin_frame,
        end = span.end_frame,
        duration = span.duration(),
        start_record = %span.start_record,
        "Mapped timeline"
    );
    Ok(span)
}

/// Fill the header fields of `sequence`.
pub fn write_header(
    sequence: &mut XmlElement,
    span: &TimelineSpan,
    run_id: &RunId,
) -> MulticamResult<()> {
    set(sequence, "uuid", run_id.to_string())?;
    set(sequence, "duration", span.duration().to_string())?;
    set(sequence, "timecode/string", span.start_timecode.clone())?;
    set(sequence, "timecode/frame", span.header_frame().to_string())?;
    Ok(())
}

pub(crate) fn set(element: &mut XmlElement, path: &str, value: String) -> MulticamResult<()> {
    element
        .require_mut(path)
        .map_err(|e| MulticamError::template(e.to_string()))?
        .set_text(value);
    Ok(())
}
