use super::IScheduledNotificationRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use dayfuse_domain::{ScheduledNotification, TaskId, ID};

pub struct InMemoryScheduledNotificationRepo {
    notifications: std::sync::Mutex<Vec<ScheduledNotification>>,
}

impl InMemoryScheduledNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn find_sorted<F: Fn(&ScheduledNotification) -> bool>(&self, compare: F) -> Vec<ScheduledNotification> {
        let mut notifications = find_by(&self.notifications, compare);
        notifications.sort_by_key(|n| n.scheduled_time);
        notifications
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for InMemoryScheduledNotificationRepo {
    async fn insert(&self, notification: &ScheduledNotification) -> anyhow::Result<()> {
        insert(notification, &self.notifications);
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> Option<ScheduledNotification> {
        find(notification_id, &self.notifications)
    }

    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<ScheduledNotification>> {
        Ok(self.find_sorted(|n| n.is_due(now)))
    }

    async fn find_pending_by_user(&self, user_id: &str) -> anyhow::Result<Vec<ScheduledNotification>> {
        Ok(self.find_sorted(|n| !n.sent && n.user_id == user_id))
    }

    async fn find_pending_by_task(&self, task_id: &TaskId) -> anyhow::Result<Vec<ScheduledNotification>> {
        Ok(self.find_sorted(|n| !n.sent && n.task_id == *task_id))
    }

    async fn mark_sent(&self, notification_id: &ID, sent_at: i64) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.notifications,
            |n| n.id == *notification_id && !n.sent,
            |n| n.mark_sent(sent_at),
        );
        Ok(!updated.is_empty())
    }

    async fn delete_pending(&self, notification_id: &ID) -> anyhow::Result<Option<ScheduledNotification>> {
        Ok(find_and_delete_by(&self.notifications, |n| {
            n.id == *notification_id && !n.sent
        })
        .into_iter()
        .next())
    }

    async fn delete_pending_by_task(&self, task_id: &TaskId) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.notifications, |n| {
            n.task_id == *task_id && !n.sent
        }))
    }
}
