//! Multicam XML Export
//!
//! Turns clip records from a [`ClipSource`](multicam_clip_source::ClipSource)
//! into an `xmeml` document with one video track per camera.
//!
//! # Pipeline
//!
//! ```text
//! ClipSource ──► map_timeline ──► write_header ─┐
//!     │                                         │
//!     └─► camera_ids ──► build_track (per cam) ─┼──► sequence/media/video
//!                            │                  │
//!                            └─► build_clip_item┘
//!                                                      ▼
//!                                              XmlDocument::write_to_path
//! ```

pub mod assembler;
pub mod clip;
pub mod template;
pub mod timeline;
pub mod track;
pub mod xml;

pub use assembler::{Assembly, AssemblyContext, AssemblyReport, TrackSummary};
pub use clip::{build_clip_item, populate_clip_item};
pub use template::{ClipTemplate, SequenceTemplate};
pub use timeline::{map_timeline, write_header, RunId};
pub use track::{build_track, BuiltTrack};
pub use xml::{XmlDocument, XmlElement, XmlError, XmlNode};
