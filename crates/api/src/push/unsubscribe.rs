use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::unsubscribe::*;
use dayfuse_domain::{PushSubscription, ID};
use dayfuse_infra::DayfuseContext;

pub async fn unsubscribe_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let usecase = UnsubscribeUseCase {
        subscription_id: path_params.subscription_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct UnsubscribeUseCase {
    pub subscription_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The push subscription with id: {}, was not found.",
                id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UnsubscribeUseCase {
    type Response = PushSubscription;

    type Error = UseCaseError;

    const NAME: &'static str = "Unsubscribe";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .push_subscriptions
            .delete(&self.subscription_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.subscription_id.clone()))
    }
}
