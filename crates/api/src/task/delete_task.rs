use crate::error::DayfuseError;
use crate::notification::sync_task_notifications::{SyncTaskNotificationsUseCase, TaskOperation};
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::delete_task::*;
use dayfuse_domain::{RemoteTask, TaskId};
use dayfuse_infra::DayfuseContext;

pub async fn delete_task_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let usecase = DeleteTaskUseCase {
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct DeleteTaskUseCase {
    pub task_id: TaskId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(TaskId),
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => Self::NotFound(format!(
                "The task with id: {}, was not found.",
                task_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteTaskUseCase {
    type Response = RemoteTask;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteTask";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        let task = ctx
            .repos
            .tasks
            .find(&self.task_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.task_id.clone()))?;

        // The task row stays until its pending notifications are gone
        let cancel_notifications = SyncTaskNotificationsUseCase {
            task: &task,
            operation: TaskOperation::Deleted,
        };
        execute(cancel_notifications, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        ctx.repos
            .tasks
            .delete(&self.task_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.task_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::task::create_task::CreateTaskUseCase;
    use crate::test_utils::{setup_context_at, setup_context_without_notification_store, HOUR};

    #[actix_web::test]
    async fn deleting_a_task_cancels_its_pending_notifications() {
        let ctx = setup_context_at(0);
        let task = execute(
            CreateTaskUseCase {
                user_id: "user".into(),
                title: "Dentist".into(),
                description: None,
                due_time: Some(HOUR),
            },
            &ctx,
        )
        .await
        .unwrap();

        execute(
            DeleteTaskUseCase {
                task_id: task.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(ctx.repos.tasks.find(&task.id).await.is_none());
        assert!(ctx
            .repos
            .scheduled_notifications
            .find_pending_by_task(&task.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn unknown_task_is_not_found() {
        let ctx = setup_context_at(0);
        let res = execute(
            DeleteTaskUseCase {
                task_id: "missing".into(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound("missing".into()));
    }

    #[actix_web::test]
    async fn task_is_kept_when_notifications_cannot_be_cancelled() {
        let ctx = setup_context_without_notification_store(0);
        let task = RemoteTask::new("user".into(), "Dentist".into(), 0);
        ctx.repos.tasks.insert(&task).await.unwrap();

        let res = execute(
            DeleteTaskUseCase {
                task_id: task.id.clone(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::StorageError);
        assert!(ctx.repos.tasks.find(&task.id).await.is_some());
    }
}
