//! Deadline parsing
//!
//! Deadlines are given as a wall-clock time of day and mean "today at that
//! local time". A time that has already passed is kept as-is; the session
//! then closes as soon as it opens.

use crate::error::{OrderError, Result};
use chrono::{DateTime, NaiveTime, TimeZone};
use std::time::Duration;

/// Parse an `HH:MM` time of day
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| OrderError::InvalidDeadline {
        raw: raw.to_string(),
    })
}

/// Combine a time of day with the calendar date of `now`
pub fn deadline_today<Tz: TimeZone>(time: NaiveTime, now: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    let local = now.date_naive().and_time(time);
    now.timezone()
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| OrderError::InvalidDeadline {
            raw: time.format("%H:%M").to_string(),
        })
}

/// Parse `HH:MM` into today's deadline relative to `now`
pub fn parse_deadline<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    deadline_today(parse_time_of_day(raw)?, now)
}

/// Time left until `deadline`, zero when it has passed
pub fn remaining<Tz: TimeZone>(deadline: &DateTime<Tz>, now: &DateTime<Tz>) -> Duration {
    deadline
        .clone()
        .signed_duration_since(now.clone())
        .to_std()
        .unwrap_or(Duration::ZERO)
}
