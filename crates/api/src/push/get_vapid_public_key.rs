use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::get_vapid_public_key::*;
use dayfuse_infra::DayfuseContext;

pub async fn get_vapid_public_key_controller(
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    execute(GetVapidPublicKeyUseCase, &ctx)
        .await
        .map(|public_key| HttpResponse::Ok().json(APIResponse { public_key }))
        .map_err(DayfuseError::from)
}

#[derive(Debug)]
pub struct GetVapidPublicKeyUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotConfigured,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotConfigured => Self::PushNotConfigured,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetVapidPublicKeyUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "GetVapidPublicKey";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        ctx.push.public_key().ok_or(UseCaseError::NotConfigured)
    }
}
