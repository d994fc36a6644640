//! UTC instants and Julian Day arithmetic.
//!
//! Every astronomical quantity in this crate is a function of a [`UtcInstant`].
//! The Julian Day is derived from the UTC epoch millisecond count only; local
//! time fields and timezone offsets never participate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day of the J2000.0 epoch (2000-01-01T12:00:00 TT, used as UTC here).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Errors raised when an instant cannot be constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInstantError {
    /// The text is not a valid RFC 3339 timestamp.
    #[error("invalid instant {input:?}: {reason}")]
    Unparseable { input: String, reason: String },

    /// A millisecond count was NaN or infinite.
    #[error("invalid instant: non-finite millisecond count {0}")]
    NonFinite(f64),

    /// A millisecond count lies outside the representable calendar range.
    #[error("invalid instant: {0} ms is out of range")]
    OutOfRange(f64),
}

/// A point in time, always held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtcInstant(DateTime<Utc>);

impl UtcInstant {
    /// Wrap an existing UTC datetime.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// The current wall-clock time.
    ///
    /// This is the only place the crate reads the system clock; computations
    /// take the instant as an argument.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Build an instant from milliseconds since the Unix epoch.
    ///
    /// Fractional milliseconds are kept to nanosecond precision.
    pub fn from_unix_millis(millis: f64) -> Result<Self, InvalidInstantError> {
        if !millis.is_finite() {
            return Err(InvalidInstantError::NonFinite(millis));
        }

        let secs = (millis / 1000.0).floor();
        if secs.abs() >= i64::MAX as f64 {
            return Err(InvalidInstantError::OutOfRange(millis));
        }
        let nanos = ((millis - secs * 1000.0) * 1_000_000.0)
            .round()
            .clamp(0.0, 999_999_999.0) as u32;

        DateTime::from_timestamp(secs as i64, nanos)
            .map(Self)
            .ok_or(InvalidInstantError::OutOfRange(millis))
    }

    /// Parse an RFC 3339 timestamp. Any UTC offset is normalized away.
    pub fn parse(input: &str) -> Result<Self, InvalidInstantError> {
        DateTime::parse_from_rfc3339(input.trim())
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| InvalidInstantError::Unparseable {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch, including the sub-millisecond part.
    pub fn unix_millis(&self) -> f64 {
        self.0.timestamp() as f64 * 1000.0 + f64::from(self.0.timestamp_subsec_nanos()) / 1e6
    }

    /// Julian Day number in UTC.
    pub fn julian_day(&self) -> f64 {
        self.unix_millis() / MILLIS_PER_DAY + UNIX_EPOCH_JD
    }

    /// Days elapsed since J2000.0 (`n` in the solar formulas).
    pub fn days_since_j2000(&self) -> f64 {
        self.julian_day() - J2000_JD
    }

    /// Julian centuries elapsed since J2000.0 (`T`).
    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / DAYS_PER_JULIAN_CENTURY
    }

    /// Shift by a signed number of seconds.
    pub fn offset_seconds(&self, seconds: f64) -> Result<Self, InvalidInstantError> {
        Self::from_unix_millis(self.unix_millis() + seconds * 1000.0)
    }
}

impl From<DateTime<Utc>> for UtcInstant {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

impl FromStr for UtcInstant {
    type Err = InvalidInstantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UtcInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch_julian_day() {
        let epoch = UtcInstant::from_unix_millis(0.0).unwrap();
        assert!((epoch.julian_day() - UNIX_EPOCH_JD).abs() < 1e-12);
    }

    #[test]
    fn test_j2000_julian_day() {
        let j2000 = UtcInstant::parse("2000-01-01T12:00:00Z").unwrap();
        assert!(
            j2000.days_since_j2000().abs() < 1e-9,
            "J2000 should be day 0, got {}",
            j2000.days_since_j2000()
        );
        assert!(j2000.centuries_since_j2000().abs() < 1e-12);
    }

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let utc = UtcInstant::parse("2024-06-21T00:00:00Z").unwrap();
        let tokyo = UtcInstant::parse("2024-06-21T09:00:00+09:00").unwrap();
        let la = UtcInstant::parse("2024-06-20T17:00:00-07:00").unwrap();
        assert_eq!(utc, tokyo);
        assert_eq!(utc, la);
        assert_eq!(utc.julian_day(), tokyo.julian_day());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = UtcInstant::parse("yesterday-ish").unwrap_err();
        assert!(matches!(err, InvalidInstantError::Unparseable { .. }));
        assert!(err.to_string().contains("yesterday-ish"));
    }

    #[test]
    fn test_parse_rejects_missing_offset() {
        // A bare local timestamp is ambiguous and must not be guessed.
        assert!(UtcInstant::parse("2024-06-21T00:00:00").is_err());
    }

    #[test]
    fn test_non_finite_millis_rejected() {
        assert!(matches!(
            UtcInstant::from_unix_millis(f64::NAN),
            Err(InvalidInstantError::NonFinite(_))
        ));
        assert!(matches!(
            UtcInstant::from_unix_millis(f64::INFINITY),
            Err(InvalidInstantError::NonFinite(_))
        ));
    }

    #[test]
    fn test_out_of_range_millis_rejected() {
        assert!(matches!(
            UtcInstant::from_unix_millis(1e300),
            Err(InvalidInstantError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_millis_round_trip_keeps_fraction() {
        let t = UtcInstant::from_unix_millis(1_718_928_000_123.5).unwrap();
        assert!((t.unix_millis() - 1_718_928_000_123.5).abs() < 1e-3);
    }

    #[test]
    fn test_negative_millis_before_epoch() {
        let t = UtcInstant::from_unix_millis(-1500.0).unwrap();
        assert_eq!(t.to_string(), "1969-12-31T23:59:58.500Z");
    }

    #[test]
    fn test_display_is_rfc3339_utc() {
        let t: UtcInstant = "2024-03-20T12:00:00Z".parse().unwrap();
        assert_eq!(t.to_string(), "2024-03-20T12:00:00.000Z");
    }

    #[test]
    fn test_offset_seconds() {
        let t = UtcInstant::parse("2024-03-20T12:00:00Z").unwrap();
        let later = t.offset_seconds(90.0).unwrap();
        assert_eq!(later.to_string(), "2024-03-20T12:01:30.000Z");
        assert!(later > t);
    }
}
