//! Timestamp source for store-managed `created_at` / `updated_at` fields.
//!
//! # Responsibility
//! - Provide a swappable "now" for stores (system time in production,
//!   fixed time in tests).
//! - Own the canonical ISO-8601 text form used on the wire and in SQLite.
//!
//! # Invariants
//! - Timestamps are UTC with millisecond precision.
//! - `next_timestamp` is strictly greater than the previous value.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current time for store mutations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock truncated to milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// Manually driven clock for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now.trunc_subsecs(3)),
        }
    }

    /// Moves the clock to `now`. Moving backwards is allowed.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now.trunc_subsecs(3);
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = (*guard + by).trunc_subsecs(3);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the `updated_at` value for a mutation of a record last touched at
/// `previous`.
///
/// Falls back to `previous + 1ms` when the clock has not moved past it, so
/// that every mutation is observable through `updated_at`.
pub fn next_timestamp(clock: &dyn Clock, previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = clock.now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, next_timestamp, parse_timestamp, Clock, FixedClock};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn next_timestamp_uses_clock_when_it_moved_forward() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::seconds(3));

        assert_eq!(next_timestamp(&clock, start), start + Duration::seconds(3));
    }

    #[test]
    fn next_timestamp_bumps_when_clock_is_stalled_or_behind() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);

        assert_eq!(
            next_timestamp(&clock, start),
            start + Duration::milliseconds(1)
        );

        clock.set(start - Duration::hours(1));
        assert_eq!(
            next_timestamp(&clock, start),
            start + Duration::milliseconds(1)
        );
    }

    #[test]
    fn fixed_clock_truncates_to_millis() {
        let with_nanos = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + Duration::nanoseconds(1_234_567);
        let clock = FixedClock::new(with_nanos);

        assert_eq!(format_timestamp(clock.now()), "2024-05-01T12:00:00.001Z");
    }

    #[test]
    fn parse_accepts_offsets_and_normalizes_to_utc() {
        let parsed = parse_timestamp("2024-01-15T02:00:00.000+02:00").unwrap();
        assert_eq!(format_timestamp(parsed), "2024-01-15T00:00:00.000Z");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
