use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DueTimeError {
    #[error("Due time: `{0}` is not a valid HH:MM time")]
    Malformed(String),
}

/// Parses a wall clock time in the `HH:MM` format used by the task store.
pub fn parse_due_time(time: &str) -> Result<NaiveTime, DueTimeError> {
    let parts = time.trim().split(':').collect::<Vec<_>>();
    if parts.len() != 2 || parts[1].len() != 2 {
        return Err(DueTimeError::Malformed(time.to_string()));
    }
    let hours = parts[0].parse::<u32>();
    let minutes = parts[1].parse::<u32>();
    match (hours, minutes) {
        (Ok(h), Ok(m)) => NaiveTime::from_hms_opt(h, m, 0)
            .ok_or_else(|| DueTimeError::Malformed(time.to_string())),
        _ => Err(DueTimeError::Malformed(time.to_string())),
    }
}

/// Resolves a local wall clock date time in the given timezone to a timestamp in millis.
///
/// Ambiguous local times (clocks turned back) resolve to the earliest instant.
/// Local times inside a gap (clocks turned forward) are moved one hour ahead.
pub fn local_to_timestamp_millis(datetime: NaiveDateTime, tz: &Tz) -> i64 {
    match tz.from_local_datetime(&datetime) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            let shifted = datetime + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) => dt.timestamp_millis(),
                LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
                // No timezone has two consecutive gaps, fall back to reading it as UTC
                LocalResult::None => Utc.from_utc_datetime(&datetime).timestamp_millis(),
            }
        }
    }
}

/// Converts a timestamp in millis to the wall clock date time of the given timezone
pub fn timestamp_millis_to_local(timestamp: i64, tz: &Tz) -> Option<NaiveDateTime> {
    Utc.timestamp_millis_opt(timestamp)
        .single()
        .map(|dt| dt.with_timezone(tz).naive_local())
}
