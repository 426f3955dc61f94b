//! Naive point in time, stored as seconds since the Unix epoch.
//!
//! No time zone is attached. Calendar conversions map the value
//! onto a zero UTC offset, so a camera clock set to local time
//! round-trips unchanged.

use std::{cmp::Ordering, fmt, ops::Sub, str::FromStr};

use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::{consts::DATE_FORMAT, DriftError};

/// Seconds since the Unix epoch. Always finite, never `-0.0`.
#[derive(Debug, Clone, Copy)]
pub struct TimeValue(f64);

impl TimeValue {
    /// New time value from seconds since epoch.
    /// Fails for NaN and infinite values.
    pub fn new(secs: f64) -> Result<Self, DriftError> {
        match secs.is_finite() {
            true => Ok(Self(unsigned_zero(secs))),
            false => Err(DriftError::NonFiniteTime(secs)),
        }
    }

    /// Whole seconds since epoch.
    pub fn from_secs(secs: i64) -> Self {
        Self(secs as f64)
    }

    pub fn secs(&self) -> f64 {
        self.0
    }

    /// Nearest whole second, halves to even.
    pub fn round(&self) -> Self {
        Self(unsigned_zero(self.0.round_ties_even()))
    }

    /// Shift by `secs` seconds (negative moves backwards).
    pub fn shift(&self, secs: f64) -> Result<Self, DriftError> {
        Self::new(self.0 + secs)
    }

    /// From a calendar date time without zone.
    pub fn from_datetime(datetime: PrimitiveDateTime) -> Self {
        let utc = datetime.assume_utc();
        Self(utc.unix_timestamp() as f64 + utc.nanosecond() as f64 / 1e9)
    }

    /// To a calendar date time without zone.
    pub fn to_datetime(&self) -> Result<PrimitiveDateTime, DriftError> {
        let whole = self.0.floor();
        let nanos = ((self.0 - whole) * 1e9).round() as i64;
        let utc = OffsetDateTime::from_unix_timestamp(whole as i64)
            .map_err(|_| DriftError::TimeRange(self.0))?;
        let utc = utc
            .checked_add(Duration::nanoseconds(nanos))
            .ok_or(DriftError::TimeRange(self.0))?;
        Ok(PrimitiveDateTime::new(utc.date(), utc.time()))
    }

    /// Parse `YYYY-MM-DD HH:MM:SS`,
    /// ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, DriftError> {
        let trimmed = value.trim();
        PrimitiveDateTime::parse(trimmed, DATE_FORMAT)
            .map(Self::from_datetime)
            .map_err(|source| DriftError::TimeParse {
                value: trimmed.to_owned(),
                source,
            })
    }

    /// Format as `YYYY-MM-DD HH:MM:SS`.
    /// Subseconds are truncated.
    pub fn format(&self) -> Result<String, DriftError> {
        Ok(self.to_datetime()?.format(DATE_FORMAT)?)
    }
}

/// Maps `-0.0` to `0.0`, leaves everything else as is.
fn unsigned_zero(secs: f64) -> f64 {
    secs + 0.0
}

impl PartialEq for TimeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeValue {}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Difference in seconds.
impl Sub for TimeValue {
    type Output = f64;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

impl FromStr for TimeValue {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format() {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(TimeValue::new(f64::NAN), Err(DriftError::NonFiniteTime(_))));
        assert!(TimeValue::new(f64::INFINITY).is_err());
        assert!(TimeValue::new(-1.5).is_ok());
    }

    #[test]
    fn parses_and_formats() {
        let t = TimeValue::parse("  2019-07-14 12:30:05 ").unwrap();
        assert_eq!(t, TimeValue::from_datetime(datetime!(2019-07-14 12:30:05)));
        assert_eq!(t.format().unwrap(), "2019-07-14 12:30:05");
        assert_eq!(t.to_string(), "2019-07-14 12:30:05");
    }

    #[test]
    fn epoch_is_zero() {
        let t = TimeValue::parse("1970-01-01 00:00:00").unwrap();
        assert_eq!(t.secs(), 0.0);
        assert_eq!(TimeValue::from_secs(-1).format().unwrap(), "1969-12-31 23:59:59");
    }

    #[test]
    fn rejects_other_formats() {
        assert!(TimeValue::parse("2019:07:14 12:30:05").is_err());
        assert!(TimeValue::parse("2019-07-14").is_err());
        assert!(TimeValue::parse("").is_err());
    }

    #[test]
    fn orders_and_subtracts() {
        let a = TimeValue::from_secs(100);
        let b = TimeValue::from_secs(130);
        assert!(a < b);
        assert_eq!(b - a, 30.0);
        assert_eq!(a.shift(-0.4).unwrap().round(), a);
    }

    #[test]
    fn rounds_halves_to_even() {
        let half = |s: f64| TimeValue::new(s).unwrap().round().secs();
        assert_eq!(half(0.5), 0.0);
        assert_eq!(half(1.5), 2.0);
        assert_eq!(half(2.5), 2.0);
        assert_eq!(half(-2.5), -2.0);
        assert_eq!(half(2.6), 3.0);
    }

    #[test]
    fn negative_zero_is_zero() {
        let zero = TimeValue::from_secs(0);
        let neg = TimeValue::new(-0.0).unwrap();
        assert_eq!(neg, zero);
        assert_eq!(neg.cmp(&zero), Ordering::Equal);
        // rounds to -0.0 before normalising
        let rounded = TimeValue::new(-0.4).unwrap().round();
        assert_eq!(rounded.cmp(&zero), Ordering::Equal);
        assert!(rounded.secs().is_sign_positive());
    }
}
