use crate::shared::usecase::UseCase;
use dayfuse_domain::{RemoteTask, ScheduledNotification};
use dayfuse_infra::DayfuseContext;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOperation {
    Created,
    Updated {
        /// Due time or completion changed
        reschedule: bool,
        /// Title or description changed
        text_changed: bool,
    },
    Deleted,
}

/// Keeps the pending notifications of a task in line with the task.
///
/// Pending notifications are always removed before new ones are written, so
/// a task never has more than one pending notification for its due time.
#[derive(Debug)]
pub struct SyncTaskNotificationsUseCase<'a> {
    pub task: &'a RemoteTask,
    pub operation: TaskOperation,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub cancelled: i64,
    pub scheduled: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl<'a> SyncTaskNotificationsUseCase<'a> {
    async fn cancel_pending(&self, ctx: &DayfuseContext) -> Result<i64, UseCaseError> {
        ctx.repos
            .scheduled_notifications
            .delete_pending_by_task(&self.task.id)
            .await
            .map(|res| res.deleted_count)
            .map_err(|_| UseCaseError::StorageError)
    }

    async fn insert(
        &self,
        notifications: Vec<ScheduledNotification>,
        ctx: &DayfuseContext,
    ) -> Result<usize, UseCaseError> {
        for notification in &notifications {
            ctx.repos
                .scheduled_notifications
                .insert(notification)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }
        Ok(notifications.len())
    }

    fn due_notification(&self, ctx: &DayfuseContext) -> Vec<ScheduledNotification> {
        ScheduledNotification::for_task(self.task, ctx.sys.get_timestamp_millis())
            .into_iter()
            .collect()
    }
}

#[async_trait::async_trait(?Send)]
impl<'a> UseCase for SyncTaskNotificationsUseCase<'a> {
    type Response = SyncResult;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncTaskNotifications";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        let mut res = SyncResult::default();
        match self.operation {
            TaskOperation::Created => {
                res.scheduled = self.insert(self.due_notification(ctx), ctx).await?;
            }
            TaskOperation::Deleted => {
                res.cancelled = self.cancel_pending(ctx).await?;
            }
            TaskOperation::Updated {
                reschedule: true, ..
            } => {
                res.cancelled = self.cancel_pending(ctx).await?;
                res.scheduled = self.insert(self.due_notification(ctx), ctx).await?;
            }
            TaskOperation::Updated {
                reschedule: false,
                text_changed: true,
            } => {
                let pending = ctx
                    .repos
                    .scheduled_notifications
                    .find_pending_by_task(&self.task.id)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                res.cancelled = self.cancel_pending(ctx).await?;
                let recreated = pending
                    .into_iter()
                    .map(|n| {
                        ScheduledNotification::new(
                            self.task.user_id.clone(),
                            self.task.id.clone(),
                            self.task.title.clone(),
                            self.task.notification_body(),
                            n.scheduled_time,
                        )
                    })
                    .collect();
                res.scheduled = self.insert(recreated, ctx).await?;
            }
            TaskOperation::Updated { .. } => {}
        }

        debug!(
            "Synced notifications of task: {}. Result: {:?}",
            self.task.id, res
        );
        Ok(res)
    }
}
