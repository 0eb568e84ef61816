//! Calendar events used in place of a notification on platforms that cannot
//! deliver one. The event carries an alarm at the due time so the calendar
//! app of the user does the reminding.

use crate::date::{parse_due_time, DueTimeError};
use crate::task::Task;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

const PRODID: &str = "-//DayFuse//Task Reminders//EN";
const UID_DOMAIN: &str = "dayfuse.app";
const EVENT_DURATION_MINUTES: i64 = 30;
const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_CALENDAR_URL: &str = "https://outlook.live.com/calendar/0/deeplink/compose";

/// Start and end of the event of a task in local wall clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventSpan {
    Timed(NaiveDateTime, NaiveDateTime),
    /// End date is exclusive
    AllDay(NaiveDate, NaiveDate),
}

impl EventSpan {
    fn of(task: &Task) -> Result<Self, DueTimeError> {
        match &task.due_time {
            Some(time) => {
                let start = task.due_date.and_time(parse_due_time(time)?);
                Ok(Self::Timed(
                    start,
                    start + Duration::minutes(EVENT_DURATION_MINUTES),
                ))
            }
            None => Ok(Self::AllDay(
                task.due_date,
                task.due_date.succ_opt().unwrap_or(task.due_date),
            )),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CalendarLinkError {
    #[error(transparent)]
    DueTime(#[from] DueTimeError),
    #[error("Unable to build calendar link: {0}")]
    Url(#[from] url::ParseError),
}

/// A calendar file ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub content: String,
}

/// Generates an iCalendar document with a single event for the task and an
/// alarm at its start.
///
/// The output only depends on the task and `dtstamp`, the UID is derived from
/// the task id so importing the file twice updates the same event.
pub fn generate_calendar_event(task: &Task, dtstamp: NaiveDateTime) -> Result<String, DueTimeError> {
    let span = EventSpan::of(task)?;
    let summary = escape_text(&task.title);

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@{}", task.id, UID_DOMAIN),
        format!("DTSTAMP:{}Z", format_datetime(dtstamp)),
    ];
    match span {
        EventSpan::Timed(start, end) => {
            lines.push(format!("DTSTART:{}", format_datetime(start)));
            lines.push(format!("DTEND:{}", format_datetime(end)));
        }
        EventSpan::AllDay(start, end) => {
            lines.push(format!("DTSTART;VALUE=DATE:{}", format_date(start)));
            lines.push(format!("DTEND;VALUE=DATE:{}", format_date(end)));
        }
    }
    lines.push(fold_line(&format!("SUMMARY:{}", summary)));
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(fold_line(&format!("DESCRIPTION:{}", escape_text(description))));
    }
    lines.extend([
        "BEGIN:VALARM".to_string(),
        "ACTION:DISPLAY".to_string(),
        fold_line(&format!("DESCRIPTION:{}", summary)),
        "TRIGGER:-PT0M".to_string(),
        "END:VALARM".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ]);

    let mut ics = lines.join("\r\n");
    ics.push_str("\r\n");
    Ok(ics)
}

/// `generate_calendar_event` packaged with a file name derived from the task title
pub fn calendar_file_for(task: &Task, dtstamp: NaiveDateTime) -> Result<CalendarFile, DueTimeError> {
    Ok(CalendarFile {
        file_name: format!("{}.ics", file_stem(&task.title)),
        content_type: "text/calendar",
        content: generate_calendar_event(task, dtstamp)?,
    })
}

/// Link that opens the Google Calendar "new event" form prefilled with the task
pub fn google_calendar_url(task: &Task, tz: &Tz) -> Result<String, CalendarLinkError> {
    let dates = match EventSpan::of(task)? {
        EventSpan::Timed(start, end) => {
            format!("{}/{}", format_datetime(start), format_datetime(end))
        }
        EventSpan::AllDay(start, end) => format!("{}/{}", format_date(start), format_date(end)),
    };
    let details = task.description.clone().unwrap_or_default();
    let url = Url::parse_with_params(
        GOOGLE_CALENDAR_URL,
        &[
            ("action", "TEMPLATE"),
            ("text", task.title.as_str()),
            ("dates", dates.as_str()),
            ("details", details.as_str()),
            ("ctz", tz.name()),
        ],
    )?;
    Ok(url.into())
}

/// Link that opens the Outlook.com compose form prefilled with the task
pub fn outlook_calendar_url(task: &Task) -> Result<String, CalendarLinkError> {
    let (start, end, all_day) = match EventSpan::of(task)? {
        EventSpan::Timed(start, end) => (
            start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "false",
        ),
        EventSpan::AllDay(start, end) => (
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string(),
            "true",
        ),
    };
    let body = task.description.clone().unwrap_or_default();
    let url = Url::parse_with_params(
        OUTLOOK_CALENDAR_URL,
        &[
            ("path", "/calendar/action/compose"),
            ("rru", "addevent"),
            ("subject", task.title.as_str()),
            ("startdt", start.as_str()),
            ("enddt", end.as_str()),
            ("allday", all_day),
            ("body", body.as_str()),
        ],
    )?;
    Ok(url.into())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

/// Content lines are folded at 75 octets, never inside a UTF-8 character
fn fold_line(s: &str) -> String {
    if s.len() <= 75 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 74 * 3);
    let mut pos = 0;
    while pos < s.len() {
        // continuation lines start with a space which counts towards the limit
        let limit = if pos == 0 { 75 } else { 74 };
        let mut end = (pos + limit).min(s.len());
        while end < s.len() && !s.is_char_boundary(end) {
            end -= 1;
        }
        if pos > 0 {
            result.push_str("\r\n ");
        }
        result.push_str(&s[pos..end]);
        pos = end;
    }
    result
}

fn file_stem(title: &str) -> String {
    let stem = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if stem.is_empty() {
        "task".into()
    } else {
        stem
    }
}
