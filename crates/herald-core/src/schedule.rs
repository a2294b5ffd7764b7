//! # Schedule Module
//!
//! Weekly reset and relink arithmetic.
//!
//! Schedules are plain values: the app builds them from configuration and the
//! caller passes in "now". Nothing here reads a clock.

use crate::primitives::{EU_RESET_HOUR_UTC, EU_RESET_WEEKDAY, NA_RESET_HOUR_UTC, NA_RESET_WEEKDAY};
use crate::Region;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Round up to the next full second.
fn ceil_to_second(instant: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = instant.nanosecond();
    if nanos == 0 {
        instant
    } else {
        instant - TimeDelta::nanoseconds(i64::from(nanos)) + TimeDelta::seconds(1)
    }
}

// =============================================================================
// RESET SCHEDULE
// =============================================================================

/// Weekly reset: a weekday and a UTC time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSchedule {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl ResetSchedule {
    #[must_use]
    pub const fn new(weekday: Weekday, time: NaiveTime) -> Self {
        Self { weekday, time }
    }

    /// Europe: Friday 18:00 UTC.
    #[must_use]
    pub fn europe() -> Self {
        Self::new(
            EU_RESET_WEEKDAY,
            NaiveTime::from_hms_opt(EU_RESET_HOUR_UTC, 0, 0).unwrap_or_default(),
        )
    }

    /// North America: Saturday 02:00 UTC.
    #[must_use]
    pub fn north_america() -> Self {
        Self::new(
            NA_RESET_WEEKDAY,
            NaiveTime::from_hms_opt(NA_RESET_HOUR_UTC, 0, 0).unwrap_or_default(),
        )
    }

    /// Default schedule of a region id. Unknown regions use the NA reset.
    #[must_use]
    pub fn for_region(region: u8) -> Self {
        match Region::from_id(region) {
            Some(Region::Europe) => Self::europe(),
            _ => Self::north_america(),
        }
    }

    /// The first reset at or after `now` (rounded up to a full second).
    ///
    /// On the reset weekday a `now` exactly at the reset time is the reset
    /// itself; any later time of day rolls over to next week.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = ceil_to_second(now);
        let today = i64::from(now.weekday().num_days_from_monday());
        let reset_day = i64::from(self.weekday.num_days_from_monday());

        let mut days = (reset_day - today).rem_euclid(7);
        if days == 0 && now.time() > self.time {
            days = 7;
        }

        (now.date_naive() + TimeDelta::days(days))
            .and_time(self.time)
            .and_utc()
    }
}

// =============================================================================
// RELINK SCHEDULE
// =============================================================================

/// World links are reshuffled every `interval_weeks` at a reset, counted
/// from `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelinkSchedule {
    pub reset: ResetSchedule,
    pub anchor: NaiveDate,
    pub interval_weeks: u32,
}

impl RelinkSchedule {
    #[must_use]
    pub const fn new(reset: ResetSchedule, anchor: NaiveDate, interval_weeks: u32) -> Self {
        Self {
            reset,
            anchor,
            interval_weeks,
        }
    }

    /// Whether the anchor date falls on the reset weekday.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.anchor.weekday() == self.reset.weekday
    }

    /// The first relink at or after `now`.
    ///
    /// `None` when that relink lies beyond the representable calendar.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let now = ceil_to_second(now);
        let anchor = self.anchor.and_time(self.reset.time).and_utc();
        if now <= anchor {
            return Some(anchor);
        }

        let period = TimeDelta::try_weeks(i64::from(self.interval_weeks.max(1)))?.num_seconds();
        let elapsed = (now - anchor).num_seconds();
        let mut periods = elapsed / period;
        if elapsed % period != 0 {
            periods += 1;
        }
        let offset = TimeDelta::try_seconds(periods.checked_mul(period)?)?;
        anchor.checked_add_signed(offset)
    }
}

// =============================================================================
// TESTS
// =============================================================================
