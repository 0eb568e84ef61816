use super::dispatch::{dispatch_to_user, DispatchOutcome};
use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::send_test_push::*;
use dayfuse_infra::{DayfuseContext, PushPayload};

pub async fn send_test_push_controller(
    path_params: web::Path<PathParams>,
    body: Option<web::Json<RequestBody>>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let body = body.map(|body| body.0).unwrap_or_default();
    let usecase = SendTestPushUseCase {
        user_id: path_params.user_id.clone(),
        title: body.title.unwrap_or_else(|| "DayFuse test notification".into()),
        body: body
            .body
            .unwrap_or_else(|| "Push notifications are working".into()),
    };

    execute(usecase, &ctx)
        .await
        .map(|outcome| {
            HttpResponse::Ok().json(APIResponse {
                sent: outcome.sent,
                failed: outcome.failed,
            })
        })
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct SendTestPushUseCase {
    pub user_id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotConfigured,
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotConfigured => Self::PushNotConfigured,
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendTestPushUseCase {
    type Response = DispatchOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "SendTestPush";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        if ctx.push.public_key().is_none() {
            return Err(UseCaseError::NotConfigured);
        }
        let payload = PushPayload::test(self.title.clone(), self.body.clone());
        dispatch_to_user(ctx, &self.user_id, &payload)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
