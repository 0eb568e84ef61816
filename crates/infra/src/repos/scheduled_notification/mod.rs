mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
use dayfuse_domain::{ScheduledNotification, TaskId, ID};
pub use inmemory::InMemoryScheduledNotificationRepo;
pub use postgres::PostgresScheduledNotificationRepo;

/// Store of the durable notifications. Only pending (unsent) rows are ever
/// deleted, sent rows stay as an audit trail.
#[async_trait::async_trait]
pub trait IScheduledNotificationRepo: Send + Sync {
    async fn insert(&self, notification: &ScheduledNotification) -> anyhow::Result<()>;
    async fn find(&self, notification_id: &ID) -> Option<ScheduledNotification>;
    /// Pending notifications with `scheduled_time <= now`, oldest first
    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<ScheduledNotification>>;
    async fn find_pending_by_user(&self, user_id: &str) -> anyhow::Result<Vec<ScheduledNotification>>;
    async fn find_pending_by_task(&self, task_id: &TaskId) -> anyhow::Result<Vec<ScheduledNotification>>;
    /// Returns false if the notification was already sent or does not exist
    async fn mark_sent(&self, notification_id: &ID, sent_at: i64) -> anyhow::Result<bool>;
    /// `None` when no pending notification has the id
    async fn delete_pending(&self, notification_id: &ID) -> anyhow::Result<Option<ScheduledNotification>>;
    async fn delete_pending_by_task(&self, task_id: &TaskId) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::create_test_contexts;
    use dayfuse_domain::{ScheduledNotification, TaskId, ID};

    fn notification(user_id: &str, task_id: &TaskId, scheduled_time: i64) -> ScheduledNotification {
        ScheduledNotification::new(
            user_id.into(),
            task_id.clone(),
            "Dentist".into(),
            "Your task is due now".into(),
            scheduled_time,
        )
    }

    #[tokio::test]
    async fn finds_due_notifications_in_order() {
        for ctx in create_test_contexts().await {
            let repo = &ctx.repos.scheduled_notifications;
            let user_id = ID::new().to_string();
            let task_id = TaskId::generate();
            // Far in the future so rows of other tests are never due before these
            let base = 4_000_000_000_000;
            let late = notification(&user_id, &task_id, base + 200);
            let early = notification(&user_id, &task_id, base + 100);
            let future = notification(&user_id, &task_id, base + 10_000);
            for n in [&late, &early, &future] {
                repo.insert(n).await.unwrap();
            }

            let due: Vec<_> = repo
                .find_due(base + 500)
                .await
                .unwrap()
                .into_iter()
                .filter(|n| n.user_id == user_id)
                .map(|n| n.id)
                .collect();
            assert_eq!(due, vec![early.id.clone(), late.id.clone()]);

            assert!(repo.mark_sent(&early.id, base + 510).await.unwrap());
            // Only once
            assert!(!repo.mark_sent(&early.id, base + 520).await.unwrap());
            let sent = repo.find(&early.id).await.unwrap();
            assert!(sent.sent);
            assert_eq!(sent.sent_at, Some(base + 510));

            let pending = repo.find_pending_by_user(&user_id).await.unwrap();
            assert_eq!(
                pending.into_iter().map(|n| n.id).collect::<Vec<_>>(),
                vec![late.id.clone(), future.id.clone()]
            );
        }
    }

    #[tokio::test]
    async fn deleting_by_task_keeps_sent_rows() {
        for ctx in create_test_contexts().await {
            let repo = &ctx.repos.scheduled_notifications;
            let user_id = ID::new().to_string();
            let task_id = TaskId::generate();
            let sent = notification(&user_id, &task_id, 100);
            let pending = notification(&user_id, &task_id, 200);
            let other_task = notification(&user_id, &TaskId::generate(), 200);
            for n in [&sent, &pending, &other_task] {
                repo.insert(n).await.unwrap();
            }
            repo.mark_sent(&sent.id, 150).await.unwrap();

            let res = repo.delete_pending_by_task(&task_id).await.unwrap();
            assert_eq!(res.deleted_count, 1);
            assert!(repo.find(&pending.id).await.is_none());
            assert!(repo.find(&sent.id).await.is_some());
            assert!(repo.find(&other_task.id).await.is_some());
            assert!(repo
                .find_pending_by_task(&task_id)
                .await
                .unwrap()
                .is_empty());
        }
    }

    #[tokio::test]
    async fn delete_pending_ignores_sent_rows() {
        for ctx in create_test_contexts().await {
            let repo = &ctx.repos.scheduled_notifications;
            let n = notification("user", &TaskId::generate(), 100);
            repo.insert(&n).await.unwrap();
            repo.mark_sent(&n.id, 100).await.unwrap();

            assert!(repo.delete_pending(&n.id).await.unwrap().is_none());
            assert!(repo.find(&n.id).await.is_some());
            assert!(repo.delete_pending(&ID::new()).await.unwrap().is_none());
        }
    }
}
