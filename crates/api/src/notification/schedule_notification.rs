use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::schedule_notification::*;
use dayfuse_domain::{ScheduledNotification, TaskId};
use dayfuse_infra::DayfuseContext;

pub async fn schedule_notification_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let body = body.0;
    let usecase = ScheduleNotificationUseCase {
        user_id: body.user_id,
        task_id: body.task_id,
        title: body.title,
        body: body.body,
        scheduled_time: body.scheduled_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| HttpResponse::Created().json(APIResponse::new(notification)))
        .map_err(DayfuseError::from)
}

/// Writes the durable record the sweep delivers from. A `scheduled_time` in
/// the past is accepted and delivered on the next sweep.
#[derive(Debug)]
pub struct ScheduleNotificationUseCase {
    pub user_id: String,
    pub task_id: TaskId,
    pub title: String,
    pub body: String,
    pub scheduled_time: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MissingUser,
    EmptyTitle,
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingUser => Self::BadClientData("The userId is empty".into()),
            UseCaseError::EmptyTitle => {
                Self::BadClientData("The notification title is empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleNotificationUseCase {
    type Response = ScheduledNotification;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleNotification";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        if self.user_id.trim().is_empty() {
            return Err(UseCaseError::MissingUser);
        }
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }

        let notification = ScheduledNotification::new(
            self.user_id.clone(),
            self.task_id.clone(),
            self.title.clone(),
            self.body.clone(),
            self.scheduled_time,
        );
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(notification)
    }
}
