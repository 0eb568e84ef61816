use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use dayfuse_domain::{
    calendar_file_for, google_calendar_url, outlook_calendar_url, CalendarFile,
    CalendarLinkError, PlatformGuidance, Task,
};

/// What the user gets instead of a notification: a calendar event carrying
/// an alarm at the due time, plus instructions for their platform.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarFallback {
    pub guidance: PlatformGuidance,
    pub file: CalendarFile,
    pub google_url: String,
    pub outlook_url: String,
}

impl CalendarFallback {
    pub fn for_task(
        task: &Task,
        guidance: PlatformGuidance,
        tz: &Tz,
        now: i64,
    ) -> Result<Self, CalendarLinkError> {
        let dtstamp = Utc
            .timestamp_millis_opt(now)
            .single()
            .unwrap_or_else(Utc::now)
            .naive_utc();

        Ok(Self {
            guidance,
            file: calendar_file_for(task, dtstamp)?,
            google_url: google_calendar_url(task, tz)?,
            outlook_url: outlook_calendar_url(task)?,
        })
    }
}
