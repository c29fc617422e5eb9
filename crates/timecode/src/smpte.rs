//! SMPTE timecode labels (`HH:MM:SS:FF`).
//!
//! Drop-frame arithmetic is selected by the frame rate, not by the
//! separator: a `;` before the frame field is accepted and remembered for
//! display, but `29.97` timecode written with `:` still drops frames.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimecodeError};
use crate::rate::FrameRate;

/// A parsed timecode label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
    /// Written with `;` before the frame field.
    pub drop_frame: bool,
}

impl Timecode {
    /// Parse a timecode and check its components against `rate`.
    pub fn parse(s: &str, rate: FrameRate) -> Result<Self> {
        let tc: Self = s.parse()?;
        tc.validate(rate)?;
        Ok(tc)
    }

    /// Check that minutes, seconds and frames fit the frame rate.
    pub fn validate(&self, rate: FrameRate) -> Result<()> {
        if rate.nominal_fps() == 0 {
            return Err(TimecodeError::invalid_frame_rate(rate.to_string()));
        }
        if self.minutes > 59 {
            return Err(TimecodeError::invalid_component("minutes", self.minutes, 59));
        }
        if self.seconds > 59 {
            return Err(TimecodeError::invalid_component("seconds", self.seconds, 59));
        }
        let max_frame = rate.nominal_fps() - 1;
        if self.frames > max_frame {
            return Err(TimecodeError::invalid_component(
                "frames",
                self.frames,
                max_frame,
            ));
        }
        Ok(())
    }

    /// Zero-based frame number of this label at `rate`.
    #[must_use]
    pub fn to_frame_number(&self, rate: FrameRate) -> i64 {
        let fps = rate.nominal_fps() as i64;
        let drop = rate.dropped_per_minute() as i64;
        let total_minutes = 60 * self.hours as i64 + self.minutes as i64;

        fps * 3600 * self.hours as i64
            + fps * 60 * self.minutes as i64
            + fps * self.seconds as i64
            + self.frames as i64
            - drop * (total_minutes - total_minutes / 10)
    }

    /// Label for a zero-based frame number at `rate`.
    ///
    /// Negative frame numbers clamp to `00:00:00:00`, as does every frame at
    /// a zero rate.
    #[must_use]
    pub fn from_frame_number(frame: i64, rate: FrameRate) -> Self {
        let fps = rate.nominal_fps() as i64;
        if fps == 0 {
            return Self {
                hours: 0,
                minutes: 0,
                seconds: 0,
                frames: 0,
                drop_frame: false,
            };
        }
        let drop = rate.dropped_per_minute() as i64;
        let mut frame = frame.max(0);

        if drop > 0 {
            let per_ten_minutes = fps * 600 - drop * 9;
            let per_minute = fps * 60 - drop;
            let tens = frame / per_ten_minutes;
            let rem = frame % per_ten_minutes;
            frame += drop * 9 * tens;
            if rem > drop {
                frame += drop * ((rem - drop) / per_minute);
            }
        }

        Self {
            hours: (frame / (fps * 3600)) as u32,
            minutes: (frame / (fps * 60) % 60) as u32,
            seconds: (frame / fps % 60) as u32,
            frames: (frame % fps) as u32,
            drop_frame: rate.is_drop_frame(),
        }
    }
}

impl FromStr for Timecode {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let drop_frame = trimmed.contains(';');
        let parts: Vec<&str> = trimmed.split([':', ';', '.']).collect();
        if parts.len() != 4 {
            return Err(TimecodeError::invalid_format(format!(
                "expected HH:MM:SS:FF, got {s:?}"
            )));
        }

        let mut values = [0u32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimecodeError::invalid_format(format!(
                    "non-numeric component {part:?} in {s:?}"
                )));
            }
            *value = part
                .parse()
                .map_err(|_| TimecodeError::invalid_format(format!("component out of range in {s:?}")))?;
        }

        Ok(Self {
            hours: values[0],
            minutes: values[1],
            seconds: values[2],
            frames: values[3],
            drop_frame,
        })
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours, self.minutes, self.seconds, sep, self.frames
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAL: FrameRate = FrameRate::Integer(25);

    #[test]
    fn test_parse_components() {
        let tc: Timecode = "01:02:03:04".parse().unwrap();
        assert_eq!((tc.hours, tc.minutes, tc.seconds, tc.frames), (1, 2, 3, 4));
        assert!(!tc.drop_frame);

        let tc: Timecode = "00:01:00;02".parse().unwrap();
        assert!(tc.drop_frame);
        assert_eq!(tc.frames, 2);

        let tc: Timecode = "10:00:00.12".parse().unwrap();
        assert_eq!(tc.frames, 12);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<Timecode>().is_err());
        assert!("01:02:03".parse::<Timecode>().is_err());
        assert!("01:02:03:04:05".parse::<Timecode>().is_err());
        assert!("01:0x:03:04".parse::<Timecode>().is_err());
        assert!("01::03:04".parse::<Timecode>().is_err());
        assert!("-1:02:03:04".parse::<Timecode>().is_err());
    }

    #[test]
    fn test_validate_against_rate() {
        assert!(Timecode::parse("00:00:00:24", PAL).is_ok());
        let err = Timecode::parse("00:00:00:25", PAL).unwrap_err();
        assert_eq!(err, TimecodeError::invalid_component("frames", 25, 24));
        assert!(Timecode::parse("00:60:00:00", PAL).is_err());
        assert!(Timecode::parse("00:00:60:00", PAL).is_err());
        assert!(Timecode::parse("00:00:00:29", FrameRate::Fps29_97).is_ok());
    }

    #[test]
    fn test_zero_rate_is_rejected_not_panicking() {
        let zero = FrameRate::Integer(0);
        let err = Timecode::parse("00:00:00:00", zero).unwrap_err();
        assert_eq!(err, TimecodeError::invalid_frame_rate("0"));

        let tc = Timecode::from_frame_number(1_000, zero);
        assert_eq!(tc.to_string(), "00:00:00:00");
    }

    #[test]
    fn test_non_drop_frame_number() {
        let tc: Timecode = "01:00:00:00".parse().unwrap();
        assert_eq!(tc.to_frame_number(PAL), 90_000);
        let tc: Timecode = "00:00:01:05".parse().unwrap();
        assert_eq!(tc.to_frame_number(PAL), 30);
        assert_eq!(tc.to_frame_number(FrameRate::Fps23_976), 29);
    }

    #[test]
    fn test_drop_frame_number() {
        let rate = FrameRate::Fps29_97;
        let tc: Timecode = "00:01:00;02".parse().unwrap();
        assert_eq!(tc.to_frame_number(rate), 1800);
        let tc: Timecode = "00:10:00;00".parse().unwrap();
        assert_eq!(tc.to_frame_number(rate), 17_982);
        let tc: Timecode = "01:00:00;00".parse().unwrap();
        assert_eq!(tc.to_frame_number(rate), 107_892);
    }

    #[test]
    fn test_from_frame_number() {
        assert_eq!(
            Timecode::from_frame_number(90_000, PAL).to_string(),
            "01:00:00:00"
        );
        assert_eq!(
            Timecode::from_frame_number(1800, FrameRate::Fps29_97).to_string(),
            "00:01:00;02"
        );
        assert_eq!(
            Timecode::from_frame_number(17_982, FrameRate::Fps29_97).to_string(),
            "00:10:00;00"
        );
        assert_eq!(Timecode::from_frame_number(-5, PAL).to_string(), "00:00:00:00");
    }

    proptest::proptest! {
        #[test]
        fn prop_frame_number_roundtrip(frame in 0i64..10_000_000, drop in proptest::bool::ANY) {
            let rate = if drop { FrameRate::Fps29_97 } else { PAL };
            let tc = Timecode::from_frame_number(frame, rate);
            proptest::prop_assert_eq!(tc.to_frame_number(rate), frame);
        }
    }
}
