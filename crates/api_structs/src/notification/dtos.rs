use dayfuse_domain::{ScheduledNotification, TaskId, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotificationDTO {
    pub id: ID,
    pub task_id: TaskId,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub scheduled_time: i64,
    pub sent: bool,
    pub sent_at: Option<i64>,
}

impl ScheduledNotificationDTO {
    pub fn new(notification: ScheduledNotification) -> Self {
        Self {
            id: notification.id,
            task_id: notification.task_id,
            user_id: notification.user_id,
            title: notification.title,
            body: notification.body,
            scheduled_time: notification.scheduled_time,
            sent: notification.sent,
            sent_at: notification.sent_at,
        }
    }
}
