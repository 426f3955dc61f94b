//! Manual time adjustment: compare the clock time visible in a photo
//! (e.g. a photographed phone screen) with the time the camera recorded,
//! and report the shift to apply.
//!
//! Only times of day are compared, dates are ignored.

use std::{fmt, path::Path, str::FromStr};

use crate::{DriftError, MetadataIo, TimeValue};

/// Time of day, `HH:MM:SS` with one or two digits per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    secs_of_day: u32,
}

impl ClockTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        match hours < 24 && minutes < 60 && seconds < 60 {
            true => Some(Self { secs_of_day: hours * 3600 + minutes * 60 + seconds }),
            false => None,
        }
    }

    pub fn parse(value: &str) -> Result<Self, DriftError> {
        let invalid = || DriftError::InvalidClockTime(value.to_owned());
        let fields = value.trim()
            .split(':')
            .map(|f| match (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()) {
                true => f.parse::<u32>().map_err(|_| invalid()),
                false => Err(invalid()),
            })
            .collect::<Result<Vec<u32>, DriftError>>()?;

        match fields.as_slice() {
            [h, m, s] => Self::new(*h, *m, *s).ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    /// Time of day of a time value.
    pub fn of(value: TimeValue) -> Result<Self, DriftError> {
        let (h, m, s) = value.to_datetime()?.time().as_hms();
        Ok(Self { secs_of_day: h as u32 * 3600 + m as u32 * 60 + s as u32 })
    }

    pub fn secs_of_day(&self) -> u32 {
        self.secs_of_day
    }
}

impl FromStr for ClockTime {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Signed shift to apply to a photo's recorded time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub seconds: i64,
}

impl Adjustment {
    /// Shift turning `recorded` into `shown`.
    pub fn between(shown: ClockTime, recorded: ClockTime) -> Self {
        Self { seconds: shown.secs_of_day as i64 - recorded.secs_of_day as i64 }
    }

    /// `+HH:MM:SS` or `-HH:MM:SS`.
    pub fn hms(&self) -> String {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let abs = self.seconds.unsigned_abs();
        format!("{sign}{:02}:{:02}:{:02}", abs / 3600, (abs % 3600) / 60, abs % 60)
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seconds {
            0 => write!(f, "Time is already correct"),
            _ => write!(f, "To correct the time for this photo, adjust it by {}", self.hms()),
        }
    }
}

/// Reads the recorded `CreateDate` of `photo` and returns the shift
/// that makes it match `shown`.
pub fn tell_adjustment(photo: &Path, shown: ClockTime, io: &dyn MetadataIo) -> Result<Adjustment, DriftError> {
    let reading = io.read_timestamp(photo, &["CreateDate".to_owned()])?;
    Ok(Adjustment::between(shown, ClockTime::of(reading.value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_time() {
        assert_eq!(ClockTime::parse("9:05:00").unwrap().secs_of_day(), 9 * 3600 + 300);
        assert!(ClockTime::parse("24:00:00").is_err());
        assert!(ClockTime::parse("12:60:00").is_err());
        assert!(ClockTime::parse("12:00").is_err());
        assert!(ClockTime::parse("012:00:00").is_err());
    }

    #[test]
    fn reports_signed_shift() {
        let shown = ClockTime::parse("10:00:00").unwrap();
        let recorded = ClockTime::parse("11:01:05").unwrap();
        let adjustment = Adjustment::between(shown, recorded);
        assert_eq!(adjustment.seconds, -3665);
        assert_eq!(adjustment.to_string(), "To correct the time for this photo, adjust it by -01:01:05");
        assert_eq!(Adjustment::between(recorded, shown).hms(), "+01:01:05");
    }

    #[test]
    fn already_correct() {
        let t = ClockTime::parse("10:00:00").unwrap();
        assert_eq!(Adjustment::between(t, t).to_string(), "Time is already correct");
    }

    #[test]
    fn time_of_day_of_value() {
        let value = TimeValue::parse("2020-05-01 13:14:15").unwrap();
        assert_eq!(ClockTime::of(value).unwrap(), ClockTime::new(13, 14, 15).unwrap());
    }
}
