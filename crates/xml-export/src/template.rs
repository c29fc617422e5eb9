//! Base document and clip fragment templates.
//!
//! Both templates are parsed once and checked for every node the assembler
//! writes, so a malformed template fails before any clip is read.

use std::path::Path;

use multicam_common::error::{MulticamError, MulticamResult};
use multicam_timecode::FrameRate;

use crate::xml::{XmlDocument, XmlElement};

/// Built-in `xmeml` document with an empty sequence.
pub const BUILTIN_SEQUENCE: &str = include_str!("../templates/sequence.xml");

/// Built-in `clipitem` fragment.
pub const BUILTIN_CLIP: &str = include_str!("../templates/clipitem.xml");

/// Paths below `sequence` filled in by the assembler.
pub const SEQUENCE_FIELDS: &[&str] = &[
    "uuid",
    "duration",
    "timecode/string",
    "timecode/frame",
    "media/video",
];

/// Paths below `clipitem` filled in by the clip builder.
pub const CLIP_FIELDS: &[&str] = &[
    "name",
    "duration",
    "out",
    "start",
    "end",
    "masterclipid",
    "file",
    "file/name",
    "file/pathurl",
    "file/duration",
    "file/timecode/string",
    "file/timecode/frame",
    "file/media/video/duration",
];

/// The base document. `sequence` is either the root or a direct child of it.
#[derive(Debug, Clone)]
pub struct SequenceTemplate {
    document: XmlDocument,
}

impl SequenceTemplate {
    pub fn parse(input: &str) -> MulticamResult<Self> {
        let document = XmlDocument::parse(input)
            .map_err(|e| MulticamError::template(format!("sequence template: {e}")))?;
        let template = Self { document };
        let sequence = template.sequence()?;
        check_fields(sequence, SEQUENCE_FIELDS, "sequence template")?;
        Ok(template)
    }

    pub fn builtin() -> MulticamResult<Self> {
        Self::parse(BUILTIN_SEQUENCE)
    }

    pub fn load(path: &Path) -> MulticamResult<Self> {
        Self::parse(&read_template(path)?)
    }

    /// Copy with every `rate` block set to `rate`.
    pub fn with_frame_rate(&self, rate: FrameRate) -> Self {
        let mut document = self.document.clone();
        apply_frame_rate(document.root_mut(), rate);
        Self { document }
    }

    /// Fresh deep copy of the document to populate.
    pub fn instantiate(&self) -> XmlDocument {
        self.document.clone()
    }

    fn sequence(&self) -> MulticamResult<&XmlElement> {
        let root = self.document.root();
        if root.name() == "sequence" {
            return Ok(root);
        }
        root.child("sequence")
            .ok_or_else(|| MulticamError::template("sequence template has no <sequence> node"))
    }
}

/// Locate the `sequence` element of an instantiated document.
pub fn sequence_mut(document: &mut XmlDocument) -> MulticamResult<&mut XmlElement> {
    let root = document.root_mut();
    if root.name() == "sequence" {
        return Ok(root);
    }
    root.child_mut("sequence")
        .ok_or_else(|| MulticamError::template("document has no <sequence> node"))
}

/// The fragment every clip entry is cloned from.
#[derive(Debug, Clone)]
pub struct ClipTemplate {
    element: XmlElement,
}

impl ClipTemplate {
    pub fn parse(input: &str) -> MulticamResult<Self> {
        let element = XmlElement::parse(input)
            .map_err(|e| MulticamError::template(format!("clip template: {e}")))?;
        if element.name() != "clipitem" {
            return Err(MulticamError::template(format!(
                "clip template root is <{}>, expected <clipitem>",
                element.name()
            )));
        }
        check_fields(&element, CLIP_FIELDS, "clip template")?;
        Ok(Self { element })
    }

    pub fn builtin() -> MulticamResult<Self> {
        Self::parse(BUILTIN_CLIP)
    }

    pub fn load(path: &Path) -> MulticamResult<Self> {
        Self::parse(&read_template(path)?)
    }

    /// Copy with every `rate` block set to `rate`.
    pub fn with_frame_rate(&self, rate: FrameRate) -> Self {
        let mut element = self.element.clone();
        apply_frame_rate(&mut element, rate);
        Self { element }
    }

    /// Fresh deep copy of the fragment. The template itself is never handed
    /// out mutably.
    pub fn instantiate(&self) -> XmlElement {
        self.element.clone()
    }
}

/// Set `timebase`/`ntsc` of every `rate` element and the `displayformat`
/// of every `timecode` element below `element`.
pub fn apply_frame_rate(element: &mut XmlElement, rate: FrameRate) {
    let ntsc = if rate.as_rational().1 == 1 { "FALSE" } else { "TRUE" };
    let display = if rate.is_drop_frame() { "DF" } else { "NDF" };
    visit_mut(element, &mut |el| match el.name().to_string().as_str() {
        "rate" => {
            if let Some(timebase) = el.child_mut("timebase") {
                timebase.set_text(rate.nominal_fps().to_string());
            }
            if let Some(flag) = el.child_mut("ntsc") {
                flag.set_text(ntsc);
            }
        }
        "timecode" => {
            if let Some(format) = el.child_mut("displayformat") {
                format.set_text(display);
            }
        }
        _ => {}
    });
}

fn visit_mut(element: &mut XmlElement, f: &mut dyn FnMut(&mut XmlElement)) {
    f(element);
    for child in element.elements_mut() {
        visit_mut(child, f);
    }
}

fn check_fields(element: &XmlElement, fields: &[&str], what: &str) -> MulticamResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|path| element.find_path(path).is_none())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MulticamError::template(format!(
            "{what} <{}> is missing: {}",
            element.name(),
            missing.join(", ")
        )))
    }
}

fn read_template(path: &Path) -> MulticamResult<String> {
    if !path.exists() {
        return Err(MulticamError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_are_complete() {
        let sequence = SequenceTemplate::builtin().unwrap();
        let doc = sequence.instantiate();
        assert_eq!(doc.doctype(), Some("xmeml"));
        assert_eq!(doc.root().name(), "xmeml");

        let clip = ClipTemplate::builtin().unwrap();
        assert_eq!(clip.instantiate().name(), "clipitem");
    }

    #[test]
    fn test_sequence_as_root_is_accepted() {
        let xml = "<sequence><uuid/><duration/><timecode><string/><frame/></timecode>\
                   <media><video/></media></sequence>";
        let template = SequenceTemplate::parse(xml).unwrap();
        let mut doc = template.instantiate();
        assert_eq!(sequence_mut(&mut doc).unwrap().name(), "sequence");
    }

    #[test]
    fn test_missing_sequence_fields_are_listed() {
        let xml = "<xmeml><sequence><uuid/><timecode><string/></timecode></sequence></xmeml>";
        let err = SequenceTemplate::parse(xml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("duration"), "{message}");
        assert!(message.contains("timecode/frame"), "{message}");
        assert!(message.contains("media/video"), "{message}");
        assert!(!message.contains("uuid"), "{message}");
    }

    #[test]
    fn test_missing_sequence_node() {
        let err = SequenceTemplate::parse("<xmeml><project/></xmeml>").unwrap_err();
        assert!(matches!(err, MulticamError::Template { .. }));
    }

    #[test]
    fn test_clip_template_root_must_be_clipitem() {
        let err = ClipTemplate::parse("<clip><name/></clip>").unwrap_err();
        assert!(err.to_string().contains("expected <clipitem>"));
    }

    #[test]
    fn test_clip_template_missing_file_subtree() {
        let xml = "<clipitem><name/><duration/><out/><start/><end/><masterclipid/></clipitem>";
        let err = ClipTemplate::parse(xml).unwrap_err();
        assert!(err.to_string().contains("file/pathurl"));
    }

    #[test]
    fn test_unparseable_template_is_template_error() {
        let err = ClipTemplate::parse("<clipitem>").unwrap_err();
        assert!(matches!(err, MulticamError::Template { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClipTemplate::load(Path::new("/nonexistent/clip.xml")).unwrap_err();
        assert!(matches!(err, MulticamError::FileNotFound { .. }));
    }

    #[test]
    fn test_frame_rate_is_stamped_on_every_rate_block() {
        let clip = ClipTemplate::builtin()
            .unwrap()
            .with_frame_rate(FrameRate::Fps29_97)
            .instantiate();

        assert_eq!(clip.find_path("rate/timebase").unwrap().text().as_deref(), Some("30"));
        assert_eq!(clip.find_path("rate/ntsc").unwrap().text().as_deref(), Some("TRUE"));
        assert_eq!(
            clip.find_path("file/timecode/rate/timebase").unwrap().text().as_deref(),
            Some("30")
        );
        assert_eq!(
            clip.find_path("file/timecode/displayformat").unwrap().text().as_deref(),
            Some("DF")
        );

        let original = ClipTemplate::builtin().unwrap().instantiate();
        assert_eq!(original.find_path("rate/timebase").unwrap().text().as_deref(), Some("25"));
    }
}
