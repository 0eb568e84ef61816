use crate::error::DayfuseError;
use crate::notification::sync_task_notifications::{SyncTaskNotificationsUseCase, TaskOperation};
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::update_task::*;
use dayfuse_domain::{RemoteTask, TaskId};
use dayfuse_infra::DayfuseContext;

pub async fn update_task_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let body = body.0;
    let usecase = UpdateTaskUseCase {
        task_id: path_params.task_id.clone(),
        title: body.title,
        description: body.description,
        due_time: body.due_time,
        completed: body.completed,
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct UpdateTaskUseCase {
    pub task_id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_time: Option<i64>,
    pub completed: Option<bool>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(TaskId),
    EmptyTitle,
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => Self::NotFound(format!(
                "The task with id: {}, was not found.",
                task_id
            )),
            UseCaseError::EmptyTitle => Self::BadClientData("The task title is empty".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateTaskUseCase {
    type Response = RemoteTask;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateTask";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        let mut task = ctx
            .repos
            .tasks
            .find(&self.task_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.task_id.clone()))?;

        let mut reschedule = false;
        let mut text_changed = false;

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            text_changed |= *title != task.title;
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            text_changed |= task.description.as_ref() != Some(description);
            task.description = Some(description.clone());
        }
        if let Some(due_time) = self.due_time {
            reschedule |= task.due_time != Some(due_time);
            task.due_time = Some(due_time);
        }
        if let Some(completed) = self.completed {
            reschedule |= task.completed != completed;
            task.completed = completed;
        }
        task.updated = ctx.sys.get_timestamp_millis();

        // Notifications are synced before the task is saved. If the sync
        // fails the stored task is unchanged, so a retry of the same update
        // detects the change again.
        let sync_task_notifications = SyncTaskNotificationsUseCase {
            task: &task,
            operation: TaskOperation::Updated {
                reschedule,
                text_changed,
            },
        };
        execute(sync_task_notifications, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        ctx.repos
            .tasks
            .save(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(task)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::task::create_task::CreateTaskUseCase;
    use crate::test_utils::{setup_context_at, UnavailableNotificationRepo, HOUR};
    use dayfuse_domain::ScheduledNotification;
    use std::sync::Arc;

    struct TestContext {
        ctx: DayfuseContext,
        task: RemoteTask,
    }

    async fn setup() -> TestContext {
        let ctx = setup_context_at(0);
        let task = execute(
            CreateTaskUseCase {
                user_id: "user".into(),
                title: "Dentist".into(),
                description: None,
                due_time: Some(9 * HOUR),
            },
            &ctx,
        )
        .await
        .unwrap();
        TestContext { ctx, task }
    }

    fn update(task_id: &TaskId) -> UpdateTaskUseCase {
        UpdateTaskUseCase {
            task_id: task_id.clone(),
            title: None,
            description: None,
            due_time: None,
            completed: None,
        }
    }

    async fn pending(ctx: &DayfuseContext, task_id: &TaskId) -> Vec<ScheduledNotification> {
        ctx.repos
            .scheduled_notifications
            .find_pending_by_task(task_id)
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn completing_cancels_pending_notifications() {
        let TestContext { ctx, task } = setup().await;
        let mut usecase = update(&task.id);
        usecase.completed = Some(true);
        let task = execute(usecase, &ctx).await.unwrap();

        assert!(task.completed);
        assert!(pending(&ctx, &task.id).await.is_empty());
    }

    #[actix_web::test]
    async fn changing_due_time_replaces_the_notification() {
        let TestContext { ctx, task } = setup().await;
        let old = pending(&ctx, &task.id).await;

        let mut usecase = update(&task.id);
        usecase.due_time = Some(10 * HOUR);
        execute(usecase, &ctx).await.unwrap();

        let pending = pending(&ctx, &task.id).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].scheduled_time, 10 * HOUR);
        assert!(ctx
            .repos
            .scheduled_notifications
            .find(&old[0].id)
            .await
            .is_none());
    }

    #[actix_web::test]
    async fn changing_text_keeps_the_time() {
        let TestContext { ctx, task } = setup().await;
        let mut usecase = update(&task.id);
        usecase.title = Some("Dentist at Main St".into());
        usecase.description = Some("Bring insurance card".into());
        execute(usecase, &ctx).await.unwrap();

        let pending = pending(&ctx, &task.id).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].scheduled_time, 9 * HOUR);
        assert_eq!(pending[0].title, "Dentist at Main St");
        assert_eq!(pending[0].body, "Bring insurance card");
    }

    #[actix_web::test]
    async fn reopening_a_task_schedules_again() {
        let TestContext { ctx, task } = setup().await;
        let mut usecase = update(&task.id);
        usecase.completed = Some(true);
        execute(usecase, &ctx).await.unwrap();

        let mut usecase = update(&task.id);
        usecase.completed = Some(false);
        execute(usecase, &ctx).await.unwrap();

        assert_eq!(pending(&ctx, &task.id).await.len(), 1);
    }

    #[actix_web::test]
    async fn completion_is_not_stored_until_notifications_are_cancelled() {
        let TestContext { mut ctx, task } = setup().await;
        let store = ctx.repos.scheduled_notifications.clone();
        ctx.repos.scheduled_notifications = Arc::new(UnavailableNotificationRepo);

        let mut usecase = update(&task.id);
        usecase.completed = Some(true);
        assert_eq!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::StorageError
        );
        assert!(!ctx.repos.tasks.find(&task.id).await.unwrap().completed);
        assert_eq!(store.find_pending_by_task(&task.id).await.unwrap().len(), 1);

        // Retrying once the store is back completes the task and cancels
        ctx.repos.scheduled_notifications = store;
        let mut usecase = update(&task.id);
        usecase.completed = Some(true);
        assert!(execute(usecase, &ctx).await.unwrap().completed);
        assert!(pending(&ctx, &task.id).await.is_empty());
    }

    #[actix_web::test]
    async fn unknown_task_is_not_found() {
        let ctx = setup_context_at(0);
        let res = execute(update(&"missing".into()), &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound("missing".into()));
    }
}
