use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::get_task::*;
use dayfuse_domain::{RemoteTask, TaskId};
use dayfuse_infra::DayfuseContext;

pub async fn get_task_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let usecase = GetTaskUseCase {
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct GetTaskUseCase {
    pub task_id: TaskId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(TaskId),
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => Self::NotFound(format!(
                "The task with id: {}, was not found.",
                task_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTaskUseCase {
    type Response = RemoteTask;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTask";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .tasks
            .find(&self.task_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.task_id.clone()))
    }
}
