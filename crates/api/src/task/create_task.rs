use super::subscribers::ScheduleNotificationOnTaskCreated;
use crate::error::DayfuseError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::create_task::*;
use dayfuse_domain::RemoteTask;
use dayfuse_infra::DayfuseContext;

pub async fn create_task_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let body = body.0;
    let usecase = CreateTaskUseCase {
        user_id: body.user_id,
        title: body.title,
        description: body.description,
        due_time: body.due_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Created().json(APIResponse::new(task)))
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct CreateTaskUseCase {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_time: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    MissingUser,
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::BadClientData("The task title is empty".into()),
            UseCaseError::MissingUser => Self::BadClientData("The userId is empty".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTaskUseCase {
    type Response = RemoteTask;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateTask";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        if self.user_id.trim().is_empty() {
            return Err(UseCaseError::MissingUser);
        }
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }

        let mut task = RemoteTask::new(
            self.user_id.clone(),
            self.title.clone(),
            ctx.sys.get_timestamp_millis(),
        );
        task.description = self.description.clone();
        task.due_time = self.due_time;

        ctx.repos
            .tasks
            .insert(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(task)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleNotificationOnTaskCreated)]
    }
}
