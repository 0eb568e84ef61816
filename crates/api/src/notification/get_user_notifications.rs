use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::get_user_notifications::*;
use dayfuse_domain::ScheduledNotification;
use dayfuse_infra::DayfuseContext;

pub async fn get_user_notifications_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let usecase = GetUserNotificationsUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|notifications| HttpResponse::Ok().json(APIResponse::new(notifications)))
        .map_err(DayfuseError::from)
}

/// Pending notifications of the user, the next one due first
#[derive(Debug)]
pub struct GetUserNotificationsUseCase {
    pub user_id: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserNotificationsUseCase {
    type Response = Vec<ScheduledNotification>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUserNotifications";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .scheduled_notifications
            .find_pending_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
