//! Multicam Timecode
//!
//! SMPTE timecode support for placing recorded clips on a frame axis:
//! - **Frame rates:** integer rates plus the NTSC fractional rates
//!   (23.976 non-drop, 29.97 and 59.94 drop-frame)
//! - **Timecode:** `HH:MM:SS:FF` parsing, formatting, and frame conversion
//! - **Converter:** the `(framerate, timecode) -> frame count` capability used
//!   by the timeline assembler
//!
//! Frame counts returned by [`TimecodeConverter::frames`] are one-based:
//! `00:00:00:00` is frame 1. Callers that need a zero-based frame subtract one.

pub mod converter;
pub mod error;
pub mod rate;
pub mod smpte;

pub use converter::{SmpteConverter, TimecodeConverter};
pub use error::{Result, TimecodeError};
pub use rate::FrameRate;
pub use smpte::Timecode;
