use super::IScheduledNotificationRepo;
use crate::repos::shared::repo::DeleteResult;
use dayfuse_domain::{ScheduledNotification, TaskId, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresScheduledNotificationRepo {
    pool: PgPool,
}

impl PostgresScheduledNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledNotificationRaw {
    notification_uid: Uuid,
    task_id: String,
    user_id: String,
    title: String,
    body: String,
    scheduled_time: i64,
    sent: bool,
    sent_at: Option<i64>,
}

impl From<ScheduledNotificationRaw> for ScheduledNotification {
    fn from(e: ScheduledNotificationRaw) -> Self {
        Self {
            id: e.notification_uid.into(),
            task_id: e.task_id.into(),
            user_id: e.user_id,
            title: e.title,
            body: e.body,
            scheduled_time: e.scheduled_time,
            sent: e.sent,
            sent_at: e.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for PostgresScheduledNotificationRepo {
    async fn insert(&self, notification: &ScheduledNotification) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduled_notifications
            (notification_uid, task_id, user_id, title, body, scheduled_time, sent, sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.task_id.as_str())
        .bind(&notification.user_id)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.scheduled_time)
        .bind(notification.sent)
        .bind(notification.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert scheduled notification: {:?}. DB returned error: {:?}",
                notification, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> Option<ScheduledNotification> {
        let res: Option<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM scheduled_notifications
            WHERE notification_uid = $1
            "#,
        )
        .bind(notification_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find scheduled notification with id: {:?} failed. DB returned error: {:?}",
                notification_id, e
            );
            e
        })
        .ok()?;
        res.map(|n| n.into())
    }

    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<ScheduledNotification>> {
        let notifications: Vec<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM scheduled_notifications
            WHERE NOT sent AND scheduled_time <= $1
            ORDER BY scheduled_time
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find due notifications before: {} failed. DB returned error: {:?}",
                now, e
            );
            e
        })?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    async fn find_pending_by_user(&self, user_id: &str) -> anyhow::Result<Vec<ScheduledNotification>> {
        let notifications: Vec<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM scheduled_notifications
            WHERE NOT sent AND user_id = $1
            ORDER BY scheduled_time
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find pending notifications for user: {:?} failed. DB returned error: {:?}",
                user_id, e
            );
            e
        })?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    async fn find_pending_by_task(&self, task_id: &TaskId) -> anyhow::Result<Vec<ScheduledNotification>> {
        let notifications: Vec<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM scheduled_notifications
            WHERE NOT sent AND task_id = $1
            ORDER BY scheduled_time
            "#,
        )
        .bind(task_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find pending notifications for task: {:?} failed. DB returned error: {:?}",
                task_id, e
            );
            e
        })?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    async fn mark_sent(&self, notification_id: &ID, sent_at: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE scheduled_notifications
            SET sent = TRUE,
            sent_at = $2
            WHERE notification_uid = $1 AND NOT sent
            "#,
        )
        .bind(notification_id.as_uuid())
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark notification: {:?} as sent. DB returned error: {:?}",
                notification_id, e
            );
            e
        })?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_pending(&self, notification_id: &ID) -> anyhow::Result<Option<ScheduledNotification>> {
        let res: Option<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            DELETE FROM scheduled_notifications
            WHERE notification_uid = $1 AND NOT sent
            RETURNING *
            "#,
        )
        .bind(notification_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete pending notification with id: {:?} failed. DB returned error: {:?}",
                notification_id, e
            );
            e
        })?;
        Ok(res.map(|n| n.into()))
    }

    async fn delete_pending_by_task(&self, task_id: &TaskId) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_notifications
            WHERE task_id = $1 AND NOT sent
            "#,
        )
        .bind(task_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete pending notifications for task: {:?} failed. DB returned error: {:?}",
                task_id, e
            );
            e
        })?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
