//! # Temporal Types
//!
//! UTC-only timestamps, validity periods, and the [`Clock`] abstraction the
//! lifecycle layer reads time through.
//!
//! ## Design Decision
//!
//! Credential validity is recomputed on every read, so "now" is an input to
//! verification rather than ambient state. Production code injects
//! [`SystemClock`]; tests and scenario replay inject [`ManualClock`] and move
//! it explicitly.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC timestamp with second-level precision.
///
/// Serializes to RFC 3339 with `Z` suffix (e.g. `2026-01-15T12:00:00Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Create a timestamp from Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp(format!("epoch seconds {secs}")))
    }

    /// Parse an RFC 3339 timestamp. Only the `Z` suffix is accepted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ValidationError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self::from_datetime(dt.with_timezone(&Utc)))
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// `self + period`, or `None` if the result is not representable.
    pub fn checked_add(&self, period: ValidityPeriod) -> Option<Self> {
        let secs = i64::try_from(period.as_secs()).ok()?;
        let delta = chrono::Duration::try_seconds(secs)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    /// RFC 3339 with `Z` suffix, seconds precision.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(dt.timestamp(), 0).unwrap_or(dt)
}

/// Length of time a credential stays valid after issuance, in seconds.
///
/// Zero is representable so that it can be rejected with a precise error
/// at mint time rather than at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidityPeriod(u64);

impl ValidityPeriod {
    /// A period of `secs` seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// A period of whole days.
    pub const fn from_days(days: u64) -> Self {
        Self(days.saturating_mul(86_400))
    }

    /// Length in seconds.
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Whether the period is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl std::str::FromStr for ValidityPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidValidityPeriod(s.to_string()))
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Shared by reference between a test and the controller under test; the
/// counter is atomic so it can be advanced while readers are active.
#[derive(Debug)]
pub struct ManualClock {
    epoch_secs: AtomicI64,
}

impl ManualClock {
    /// A clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            epoch_secs: AtomicI64::new(start.epoch_secs()),
        }
    }

    /// A clock frozen at the given epoch second.
    pub fn at_epoch(secs: i64) -> Self {
        Self {
            epoch_secs: AtomicI64::new(secs),
        }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        let delta = i64::try_from(secs).unwrap_or(i64::MAX);
        self.epoch_secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(delta))
            })
            .ok();
    }

    /// Set the clock to an absolute instant.
    pub fn set(&self, at: Timestamp) {
        self.epoch_secs.store(at.epoch_secs(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let secs = self.epoch_secs.load(Ordering::SeqCst);
        // Out-of-range values saturate to the Unix epoch.
        Timestamp::from_epoch_secs(secs).unwrap_or_else(|_| Timestamp(DateTime::<Utc>::default()))
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn now_has_no_subsecond_component() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn parse_accepts_z_suffix() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn parse_rejects_offsets() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
    }

    #[test]
    fn parse_truncates_fractional_seconds() {
        let ts = Timestamp::parse("2026-01-15T12:00:00.987Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn checked_add_moves_forward_by_period() {
        let start = Timestamp::from_epoch_secs(1_000).unwrap();
        let end = start.checked_add(ValidityPeriod::from_secs(1_000)).unwrap();
        assert_eq!(end.epoch_secs(), 2_000);
    }

    #[test]
    fn checked_add_rejects_overflow() {
        let start = Timestamp::from_epoch_secs(0).unwrap();
        assert!(start.checked_add(ValidityPeriod::from_secs(u64::MAX)).is_none());
    }

    #[test]
    fn validity_period_positivity() {
        assert!(!ValidityPeriod::from_secs(0).is_positive());
        assert!(ValidityPeriod::from_secs(1).is_positive());
        assert_eq!(ValidityPeriod::from_days(2).as_secs(), 172_800);
    }

    #[test]
    fn validity_period_parses_seconds() {
        assert_eq!("1000".parse::<ValidityPeriod>().unwrap().as_secs(), 1_000);
        assert!("-1".parse::<ValidityPeriod>().is_err());
        assert!("1d".parse::<ValidityPeriod>().is_err());
    }

    #[test]
    fn manual_clock_advances_only_when_told() {
        let clock = ManualClock::at_epoch(10_000);
        assert_eq!(clock.now().epoch_secs(), 10_000);
        assert_eq!(clock.now().epoch_secs(), 10_000);
        clock.advance(1_001);
        assert_eq!(clock.now().epoch_secs(), 11_001);
        clock.set(Timestamp::from_epoch_secs(5).unwrap());
        assert_eq!(clock.now().epoch_secs(), 5);
    }

    #[test]
    fn timestamp_serde_uses_rfc3339() {
        let ts = Timestamp::from_epoch_secs(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    proptest! {
        #[test]
        fn checked_add_is_strictly_increasing(start in 0i64..4_000_000_000, secs in 1u64..1_000_000_000) {
            let ts = Timestamp::from_epoch_secs(start).unwrap();
            let end = ts.checked_add(ValidityPeriod::from_secs(secs)).unwrap();
            prop_assert!(end > ts);
            prop_assert_eq!(end.epoch_secs() - ts.epoch_secs(), secs as i64);
        }
    }
}
