use super::create_task::CreateTaskUseCase;
use crate::notification::sync_task_notifications::{SyncTaskNotificationsUseCase, TaskOperation};
use crate::shared::usecase::{execute, Subscriber};
use dayfuse_domain::RemoteTask;
use dayfuse_infra::DayfuseContext;

pub struct ScheduleNotificationOnTaskCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateTaskUseCase> for ScheduleNotificationOnTaskCreated {
    async fn notify(&self, task: &RemoteTask, ctx: &DayfuseContext) {
        let sync_task_notifications = SyncTaskNotificationsUseCase {
            task,
            operation: TaskOperation::Created,
        };

        // Sideeffect, ignore result
        let _ = execute(sync_task_notifications, ctx).await;
    }
}
