use crate::date::{local_to_timestamp_millis, parse_due_time, DueTimeError};
use crate::shared::entity::{Entity, TaskId};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A to-do item as kept by the task store of the app.
///
/// The reminder system only reads tasks, it never changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    /// Local wall clock time in the `HH:MM` format. A task without a due time
    /// is a date-only task and never gets a timed reminder.
    #[serde(default)]
    pub due_time: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new<T: Into<String>>(id: TaskId, title: T, due_date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            due_date,
            due_time: None,
            completed: false,
        }
    }

    /// The instant the task is due at: `due_date` at local midnight plus the
    /// parsed `due_time`, with zero seconds. `None` for date-only tasks.
    pub fn due_timestamp_millis(&self, tz: &Tz) -> Result<Option<i64>, DueTimeError> {
        let due_time = match &self.due_time {
            Some(time) => parse_due_time(time)?,
            None => return Ok(None),
        };
        let due = self.due_date.and_time(due_time);
        Ok(Some(local_to_timestamp_millis(due, tz)))
    }

    /// Text shown in the body of a reminder for this task
    pub fn reminder_body(&self) -> String {
        match &self.description {
            Some(description) if !description.trim().is_empty() => description.clone(),
            _ => match &self.due_time {
                Some(time) => format!("Due at {}", time),
                None => "This task is due today".into(),
            },
        }
    }
}

/// A task as stored by the push relay. Its due time is an absolute instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTask {
    pub id: TaskId,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_time: Option<i64>,
    pub completed: bool,
    pub created: i64,
    pub updated: i64,
}

impl RemoteTask {
    pub fn new(user_id: String, title: String, created: i64) -> Self {
        Self {
            id: TaskId::generate(),
            user_id,
            title,
            description: None,
            due_time: None,
            completed: false,
            created,
            updated: created,
        }
    }

    /// A relay task needs a durable notification only while it is open and
    /// its due time lies ahead.
    pub fn needs_notification(&self, now: i64) -> bool {
        !self.completed && matches!(self.due_time, Some(due) if due > now)
    }

    pub fn notification_body(&self) -> String {
        match &self.description {
            Some(description) if !description.trim().is_empty() => description.clone(),
            _ => "Your task is due now".into(),
        }
    }
}

impl Entity<TaskId> for RemoteTask {
    fn id(&self) -> &TaskId {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::UTC;

    fn task(due_time: Option<&str>) -> Task {
        let mut task = Task::new(
            "task-1".into(),
            "Water plants",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        task.due_time = due_time.map(String::from);
        task
    }

    #[test]
    fn it_computes_due_instant() {
        let due = task(Some("09:00")).due_timestamp_millis(&UTC).unwrap();
        assert_eq!(
            due,
            Some(
                Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
                    .unwrap()
                    .timestamp_millis()
            )
        );
    }

    #[test]
    fn date_only_tasks_have_no_due_instant() {
        assert_eq!(task(None).due_timestamp_millis(&UTC).unwrap(), None);
    }

    #[test]
    fn it_rejects_malformed_due_time() {
        assert!(task(Some("9am")).due_timestamp_millis(&UTC).is_err());
    }

    #[test]
    fn remote_task_needs_notification_only_when_open_and_ahead() {
        let mut task = RemoteTask::new("user".into(), "Call mom".into(), 0);
        assert!(!task.needs_notification(10));
        task.due_time = Some(100);
        assert!(task.needs_notification(10));
        assert!(!task.needs_notification(100));
        task.completed = true;
        assert!(!task.needs_notification(10));
    }

    #[test]
    fn it_deserializes_task_record() {
        let json = r#"{"id":"abc","title":"Dentist","dueDate":"2025-06-01","dueTime":"09:00"}"#;
        let task: Task = serde_json::from_str(json).expect("To parse task");
        assert_eq!(task.id, TaskId::new("abc"));
        assert_eq!(task.due_time.as_deref(), Some("09:00"));
        assert!(!task.completed);
    }
}
