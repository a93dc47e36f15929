//! Time-of-week context used by travel-time prediction.
//!
//! Only two coarse features matter to the cost model: the hour of day and
//! the day of week.  A `TimeContext` is derived once per request from a
//! caller-supplied timestamp (or the current local time) and is then
//! `Copy`-passed into every cost evaluation.
//!
//! Day numbering starts at Monday = 0 and ends at Sunday = 6.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

use crate::{CoreError, CoreResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeContext {
    hour:        u8,
    day_of_week: u8,
}

impl TimeContext {
    /// Build a context from raw components.
    ///
    /// Fails with [`CoreError::InvalidTimeContext`] unless `hour < 24` and
    /// `day_of_week < 7`.
    pub fn new(hour: u8, day_of_week: u8) -> CoreResult<Self> {
        if hour > 23 || day_of_week > 6 {
            return Err(CoreError::InvalidTimeContext { hour, day_of_week });
        }
        Ok(Self { hour, day_of_week })
    }

    /// Derive the context from a timestamp in any time zone.  The hour and
    /// weekday are read in that zone, not converted to UTC.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            hour:        at.hour() as u8,
            day_of_week: at.weekday().num_days_from_monday() as u8,
        }
    }

    /// Context for the current local wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    #[inline]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[inline]
    pub fn day_of_week(self) -> u8 {
        self.day_of_week
    }

    /// Saturday or Sunday.
    #[inline]
    pub fn is_weekend(self) -> bool {
        self.day_of_week >= 5
    }
}

impl std::fmt::Display for TimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
        write!(f, "{} {:02}:00", DAYS[self.day_of_week as usize], self.hour)
    }
}
