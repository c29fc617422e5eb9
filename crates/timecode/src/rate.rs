//! Frame rates accepted for the global timeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimecodeError};

/// Frame rate of the timeline and of every recorded timecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrameRate {
    /// 23.976 fps (24000/1001), counted as 24 fps non-drop.
    Fps23_976,
    /// 29.97 fps (30000/1001), drop-frame.
    Fps29_97,
    /// 59.94 fps (60000/1001), drop-frame.
    Fps59_94,
    /// Any whole-number rate (24, 25, 30, 50, 60, ...).
    Integer(u32),
}

impl FrameRate {
    /// Integer frames per second used for timecode labels.
    #[must_use]
    pub fn nominal_fps(&self) -> u32 {
        match self {
            Self::Fps23_976 => 24,
            Self::Fps29_97 => 30,
            Self::Fps59_94 => 60,
            Self::Integer(fps) => *fps,
        }
    }

    /// Whether timecode at this rate skips frame labels.
    #[must_use]
    pub fn is_drop_frame(&self) -> bool {
        matches!(self, Self::Fps29_97 | Self::Fps59_94)
    }

    /// Frame labels skipped at the start of every minute not divisible by ten.
    #[must_use]
    pub fn dropped_per_minute(&self) -> u32 {
        match self {
            Self::Fps29_97 => 2,
            Self::Fps59_94 => 4,
            _ => 0,
        }
    }

    /// Frame rate as a rational number (numerator, denominator).
    #[must_use]
    pub fn as_rational(&self) -> (u32, u32) {
        match self {
            Self::Fps23_976 => (24000, 1001),
            Self::Fps29_97 => (30000, 1001),
            Self::Fps59_94 => (60000, 1001),
            Self::Integer(fps) => (*fps, 1),
        }
    }
}

impl FromStr for FrameRate {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed {
            "23.976" | "23.98" => Ok(Self::Fps23_976),
            "29.97" => Ok(Self::Fps29_97),
            "59.94" => Ok(Self::Fps59_94),
            _ => match trimmed.parse::<u32>() {
                Ok(fps) if fps > 0 => Ok(Self::Integer(fps)),
                _ => Err(TimecodeError::invalid_frame_rate(s)),
            },
        }
    }
}

impl TryFrom<String> for FrameRate {
    type Error = TimecodeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FrameRate> for String {
    fn from(rate: FrameRate) -> Self {
        rate.to_string()
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fps23_976 => write!(f, "23.976"),
            Self::Fps29_97 => write!(f, "29.97"),
            Self::Fps59_94 => write!(f, "59.94"),
            Self::Integer(fps) => write!(f, "{fps}"),
        }
    }
}
