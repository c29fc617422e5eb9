//! Document assembler.
//!
//! One synchronous pass: map the frame axis, fill the sequence header,
//! build one track per camera, then serialize. Nothing is written to disk
//! until the whole document exists in memory.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use multicam_clip_model::{RecordKey, TimelineSpan};
use multicam_clip_source::ClipSource;
use multicam_common::error::{MulticamError, MulticamResult};
use multicam_timecode::{FrameRate, TimecodeConverter};

use crate::template::{sequence_mut, ClipTemplate, SequenceTemplate};
use crate::timeline::{map_timeline, write_header, RunId};
use crate::track::build_track;
use crate::xml::{XmlDocument, XmlError};

/// Everything one assembly run reads from.
#[derive(Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub source: &'a dyn ClipSource,
    pub converter: &'a dyn TimecodeConverter,
    pub sequence_template: &'a SequenceTemplate,
    pub clip_template: &'a ClipTemplate,
}

/// Per-track line of an [`AssemblyReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackSummary {
    pub camera: RecordKey,
    pub clips: usize,
    pub overlaps: usize,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub frame_rate: FrameRate,
    pub span: TimelineSpan,
    pub tracks: Vec<TrackSummary>,
}

impl AssemblyReport {
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips).sum()
    }

    pub fn overlap_count(&self) -> usize {
        self.tracks.iter().map(|t| t.overlaps).sum()
    }
}

/// An assembled document, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: XmlDocument,
    pub report: AssemblyReport,
}

impl Assembly {
    pub fn to_xml_string(&self) -> MulticamResult<String> {
        self.document.to_pretty_string().map_err(xml_error)
    }

    /// Atomically write the document to `output`.
    pub fn write_to(&self, output: &Path) -> MulticamResult<()> {
        self.document.write_to_path(output).map_err(xml_error)
    }
}

impl<'a> AssemblyContext<'a> {
    pub fn new(
        source: &'a dyn ClipSource,
        converter: &'a dyn TimecodeConverter,
        sequence_template: &'a SequenceTemplate,
        clip_template: &'a ClipTemplate,
    ) -> Self {
        Self {
            source,
            converter,
            sequence_template,
            clip_template,
        }
    }

    /// Build the complete document in memory.
    pub fn assemble(&self, run_id: RunId) -> MulticamResult<Assembly> {
        let span = map_timeline(self.source)?;

        let mut document = self.sequence_template.instantiate();
        let sequence = sequence_mut(&mut document)?;
        write_header(sequence, &span, &run_id)?;

        let cameras = self
            .source
            .camera_ids()
            .map_err(|e| MulticamError::source(e.to_string()))?;
        tracing::info!(
            cameras = cameras.len(),
            origin = span.origin_frame,
            duration = span.duration(),
            "Assembling timeline"
        );

        let video = sequence
            .require_mut("media/video")
            .map_err(|e| MulticamError::template(e.to_string()))?;
        let mut tracks = Vec::with_capacity(cameras.len());
        for camera in &cameras {
            let built = build_track(self, camera, &span)?;
            tracks.push(TrackSummary {
                camera: built.camera,
                clips: built.clip_count,
                overlaps: built.overlaps,
            });
            video.push_child(built.element);
        }

        let report = AssemblyReport {
            run_id,
            generated_at: Utc::now(),
            frame_rate: self.converter.frame_rate(),
            span,
            tracks,
        };
        Ok(Assembly { document, report })
    }

    /// Assemble with a fresh [`RunId`] and write the result to `output`.
    pub fn generate(&self, output: &Path) -> MulticamResult<AssemblyReport> {
        self.generate_with(output, RunId::generate())
    }

    pub fn generate_with(&self, output: &Path, run_id: RunId) -> MulticamResult<AssemblyReport> {
        let assembly = self.assemble(run_id)?;
        assembly.write_to(output)?;
        tracing::info!(
            output = %output.display(),
            run_id = %assembly.report.run_id,
            tracks = assembly.report.tracks.len(),
            clips = assembly.report.clip_count(),
            "Timeline written"
        );
        Ok(assembly.report)
    }
}

fn xml_error(err: XmlError) -> MulticamError {
    match err {
        XmlError::Io(io) => MulticamError::Io(io),
        other => MulticamError::template(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multicam_clip_model::ClipRecord;
    use multicam_clip_source::MemoryClipSource;
    use multicam_timecode::SmpteConverter;
    use uuid::Uuid;

    use crate::xml::XmlElement;

    fn rec(id: i64, cam: &str, tc: &str, first: i64, last: i64) -> ClipRecord {
        ClipRecord::new(id, cam, tc, last - first, first, last, format!("/media/{cam}/c{id}.mov"))
            .unwrap()
    }

    fn two_cameras() -> MemoryClipSource {
        MemoryClipSource::new(vec![
            rec(1, "A", "10:00:04:00", 100, 160),
            rec(2, "A", "10:00:08:00", 200, 260),
            rec(3, "B", "10:00:06:00", 150, 210),
        ])
    }

    #[test]
    fn test_assemble_two_cameras() {
        let source = two_cameras();
        let converter = SmpteConverter::new(FrameRate::Integer(25));
        let sequence = SequenceTemplate::builtin().unwrap();
        let clip = ClipTemplate::builtin().unwrap();
        let ctx = AssemblyContext::new(&source, &converter, &sequence, &clip);

        let assembly = ctx.assemble(RunId::from_uuid(Uuid::nil())).unwrap();

        let seq = assembly.document.root().child("sequence").unwrap();
        assert_eq!(seq.child("duration").and_then(XmlElement::text).as_deref(), Some("160"));
        assert_eq!(
            seq.find_path("timecode/frame").and_then(XmlElement::text).as_deref(),
            Some("99")
        );

        let video = seq.find_path("media/video").unwrap();
        let tracks: Vec<&XmlElement> = video.children_named("track").collect();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].children_named("clipitem").count(), 2);
        assert_eq!(tracks[1].children_named("clipitem").count(), 1);
        // format block stays ahead of the tracks
        assert_eq!(video.elements().next().map(XmlElement::name), Some("format"));

        assert_eq!(assembly.report.clip_count(), 3);
        assert_eq!(assembly.report.tracks[0].camera, RecordKey::from("A"));
        assert_eq!(assembly.report.span.duration(), 160);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let source = two_cameras();
        let converter = SmpteConverter::new(FrameRate::Fps29_97);
        let sequence = SequenceTemplate::builtin().unwrap();
        let clip = ClipTemplate::builtin().unwrap();
        let ctx = AssemblyContext::new(&source, &converter, &sequence, &clip);

        let report = ctx.assemble(RunId::generate()).unwrap().report;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["frame_rate"], "29.97");
        assert_eq!(json["span"]["origin_frame"], 100);
        assert_eq!(json["tracks"][1]["camera"], "B");
    }

    #[test]
    fn test_empty_source_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("timeline.xml");
        let source = MemoryClipSource::default();
        let converter = SmpteConverter::new(FrameRate::Integer(25));
        let sequence = SequenceTemplate::builtin().unwrap();
        let clip = ClipTemplate::builtin().unwrap();
        let ctx = AssemblyContext::new(&source, &converter, &sequence, &clip);

        let err = ctx.generate(&output).unwrap_err();
        assert!(matches!(err, MulticamError::EmptySource));
        assert!(!output.exists());
        assert!(!output.parent().unwrap().exists());
    }
}
