use crate::shared::entity::{Entity, TaskId, ID};
use crate::task::RemoteTask;

/// Durable record of a notification the relay has to push at `scheduled_time`.
///
/// A row is pending until it has been delivered to at least one device.
/// Sent rows are never deleted, they are kept as an audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    pub id: ID,
    pub task_id: TaskId,
    pub user_id: String,
    pub title: String,
    pub body: String,
    /// Timestamp in millis
    pub scheduled_time: i64,
    pub sent: bool,
    pub sent_at: Option<i64>,
}

impl ScheduledNotification {
    pub fn new(
        user_id: String,
        task_id: TaskId,
        title: String,
        body: String,
        scheduled_time: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            task_id,
            user_id,
            title,
            body,
            scheduled_time,
            sent: false,
            sent_at: None,
        }
    }

    /// Notification for the due time of a relay task, `None` when the task does not need one
    pub fn for_task(task: &RemoteTask, now: i64) -> Option<Self> {
        if !task.needs_notification(now) {
            return None;
        }
        let due = task.due_time?;
        Some(Self::new(
            task.user_id.clone(),
            task.id.clone(),
            task.title.clone(),
            task.notification_body(),
            due,
        ))
    }

    pub fn is_due(&self, now: i64) -> bool {
        !self.sent && self.scheduled_time <= now
    }

    pub fn mark_sent(&mut self, at: i64) {
        self.sent = true;
        self.sent_at = Some(at);
    }
}

impl Entity for ScheduledNotification {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_notification_for_future_task() {
        let mut task = RemoteTask::new("u1".into(), "Dentist".into(), 0);
        assert!(ScheduledNotification::for_task(&task, 0).is_none());

        task.due_time = Some(1000);
        let notification = ScheduledNotification::for_task(&task, 0).unwrap();
        assert_eq!(notification.scheduled_time, 1000);
        assert_eq!(notification.body, "Your task is due now");
        assert!(!notification.sent);

        assert!(ScheduledNotification::for_task(&task, 1000).is_none());
    }

    #[test]
    fn it_is_due_until_sent() {
        let mut notification =
            ScheduledNotification::new("u1".into(), "t1".into(), "a".into(), "b".into(), 50);
        assert!(!notification.is_due(49));
        assert!(notification.is_due(50));
        notification.mark_sent(60);
        assert!(!notification.is_due(100));
        assert_eq!(notification.sent_at, Some(60));
    }
}
