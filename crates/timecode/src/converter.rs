//! Timecode-to-frame conversion capability.

use crate::error::Result;
use crate::rate::FrameRate;
use crate::smpte::Timecode;

/// Converts a timecode label into an absolute frame count.
///
/// Frame counts are one-based: the label `00:00:00:00` is frame 1.
pub trait TimecodeConverter {
    /// One-based frame count of `timecode`.
    fn frames(&self, timecode: &str) -> Result<i64>;

    /// Rate the converter interprets timecode at.
    fn frame_rate(&self) -> FrameRate;
}

/// SMPTE converter for a single global frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmpteConverter {
    rate: FrameRate,
}

impl SmpteConverter {
    pub fn new(rate: FrameRate) -> Self {
        Self { rate }
    }
}

impl TimecodeConverter for SmpteConverter {
    fn frames(&self, timecode: &str) -> Result<i64> {
        let tc = Timecode::parse(timecode, self.rate)?;
        Ok(tc.to_frame_number(self.rate) + 1)
    }

    fn frame_rate(&self) -> FrameRate {
        self.rate
    }
}
