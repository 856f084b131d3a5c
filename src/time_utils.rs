// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use crate::models::TimeInterval;
use chrono::{DateTime, Duration, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Source of the aggregator's day windows.
///
/// Windows are computed with the full time zone, not just the current
/// offset, so midnight lands correctly on daylight-saving change days.
pub trait Clock: Send + Sync {
    fn windows(&self) -> DayWindows;
}

/// Wall clock in the device's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn windows(&self) -> DayWindows {
        DayWindows::at(&Local::now())
    }
}

/// Clock pinned to a single instant in a given zone.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone>(pub DateTime<Tz>);

impl<Tz> Clock for FixedClock<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    fn windows(&self) -> DayWindows {
        DayWindows::at(&self.0)
    }
}

/// Today/yesterday boundaries relative to a local "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindows {
    pub now: DateTime<Utc>,
    pub start_of_today: DateTime<Utc>,
    pub start_of_yesterday: DateTime<Utc>,
}

impl DayWindows {
    /// Compute windows from `now` in its own time zone.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let start_of_today = local_midnight(&tz, today).unwrap_or_else(|| {
            now.with_timezone(&Utc) - Duration::seconds(seconds_since_midnight(now))
        });
        let start_of_yesterday = today
            .pred_opt()
            .and_then(|day| local_midnight(&tz, day))
            .unwrap_or(start_of_today - Duration::days(1));

        Self {
            now: now.with_timezone(&Utc),
            start_of_today,
            start_of_yesterday,
        }
    }

    /// `[start of today, now)`
    pub fn today(&self) -> TimeInterval {
        TimeInterval::new(self.start_of_today, self.now)
    }

    /// `[start of yesterday, start of today)`
    pub fn yesterday(&self) -> TimeInterval {
        TimeInterval::new(self.start_of_yesterday, self.start_of_today)
    }
}

/// First instant of `day` in `tz`.
///
/// Where a transition skips midnight the day starts at the end of the gap,
/// searched in half-hour steps.
fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    (0..=4).find_map(|step| {
        tz.from_local_datetime(&(midnight + Duration::minutes(30 * step)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

fn seconds_since_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    use chrono::Timelike;
    i64::from(now.num_seconds_from_midnight())
}
