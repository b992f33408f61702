//! Time provider abstraction
//!
//! [`Clock`] lets production code read the system time while tests pin
//! "now" to a known instant. [`DayBoundary`] decides which time zone's
//! midnight closes a calendar day.

use std::fmt::Debug;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use parking_lot::Mutex;

/// A source of the current instant
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock using real system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock that only moves when told to
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use patronkv::{Clock, FixedClock};
///
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
/// let before = clock.now();
/// clock.advance(Duration::hours(1));
/// assert_eq!(clock.now() - before, Duration::hours(1));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward (or back, for a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to a specific instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

/// Which time zone's midnight starts a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// The host's local time zone
    #[default]
    Local,

    /// UTC, independent of the host
    Utc,
}

impl DayBoundary {
    /// Truncate `instant` to midnight of its calendar day
    ///
    /// Hours, minutes, seconds and sub-seconds are zeroed in this boundary's
    /// time zone; the result is returned as a UTC instant.
    pub fn midnight(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DayBoundary::Utc => instant.date_naive().and_time(NaiveTime::MIN).and_utc(),
            DayBoundary::Local => {
                let day = instant.with_timezone(&Local).date_naive();
                local_day_start(day.and_time(NaiveTime::MIN)).unwrap_or(instant)
            }
        }
    }
}

/// First local instant of the day beginning at `midnight`
///
/// A DST change can make local midnight ambiguous (take the earlier) or
/// skip it entirely (take the first hour that exists).
fn local_day_start(midnight: NaiveDateTime) -> Option<DateTime<Utc>> {
    let resolved = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest(),
    };
    resolved.map(|dt| dt.with_timezone(&Utc))
}
