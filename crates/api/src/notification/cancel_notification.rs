use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::cancel_notification::*;
use dayfuse_domain::{ScheduledNotification, ID};
use dayfuse_infra::DayfuseContext;

pub async fn cancel_notification_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let usecase = CancelNotificationUseCase {
        notification_id: path_params.notification_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|notification| HttpResponse::Ok().json(APIResponse::new(notification)))
        .map_err(DayfuseError::from)
}

/// Removes a single pending notification. Sent notifications cannot be cancelled.
#[derive(Debug)]
pub struct CancelNotificationUseCase {
    pub notification_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "No pending notification with id: {} was found.",
                id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelNotificationUseCase {
    type Response = ScheduledNotification;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelNotification";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .scheduled_notifications
            .delete_pending(&self.notification_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.notification_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{setup_context_at, setup_context_without_notification_store, HOUR};

    #[actix_web::test]
    async fn cancels_only_pending_notifications() {
        let ctx = setup_context_at(0);
        let notification = ScheduledNotification::new(
            "user".into(),
            "task".into(),
            "Dentist".into(),
            "Your task is due now".into(),
            HOUR,
        );
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();

        let usecase = || CancelNotificationUseCase {
            notification_id: notification.id.clone(),
        };
        assert_eq!(execute(usecase(), &ctx).await.unwrap().id, notification.id);
        assert_eq!(
            execute(usecase(), &ctx).await.unwrap_err(),
            UseCaseError::NotFound(notification.id.clone())
        );
    }

    #[actix_web::test]
    async fn storage_failure_is_not_reported_as_missing() {
        let ctx = setup_context_without_notification_store(0);
        let res = execute(
            CancelNotificationUseCase {
                notification_id: ID::new(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::StorageError);
        assert!(matches!(
            DayfuseError::from(UseCaseError::StorageError),
            DayfuseError::InternalError
        ));
    }
}
