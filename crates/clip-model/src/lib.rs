//! Multicam Clip Model
//!
//! Defines the data contracts between the clip record source and the XML
//! assembler:
//! - **Records:** One validated row per recorded clip
//! - **Span:** The global frame axis (origin, end, duration) of a run
//! - **Entries:** The derived, XML-visible fields of one placed clip
//!
//! Everything here is pure computation over owned values; no I/O.

pub mod entry;
pub mod record;
pub mod span;

pub use entry::*;
pub use record::*;
pub use span::*;
