use crate::error::DayfuseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use dayfuse_api_structs::subscribe::*;
use dayfuse_domain::PushSubscription;
use dayfuse_infra::DayfuseContext;

pub async fn subscribe_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DayfuseContext>,
) -> Result<HttpResponse, DayfuseError> {
    let body = body.0;
    let usecase = SubscribeUseCase {
        user_id: body.user_id,
        endpoint: body.endpoint,
        p256dh: body.p256dh,
        auth: body.auth,
        user_agent: body.user_agent,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| {
            HttpResponse::Created().json(APIResponse {
                subscription_id: subscription.id,
            })
        })
        .map_err(DayfuseError::from)
}

/// Registers a device for push. Registering an endpoint that is already
/// known takes over the new keys and owner and reactivates it.
#[derive(Debug)]
pub struct SubscribeUseCase {
    pub user_id: String,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MissingField(&'static str),
    StorageError,
}

impl From<UseCaseError> for DayfuseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingField(field) => {
                Self::BadClientData(format!("The push subscription is missing `{}`", field))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SubscribeUseCase {
    type Response = PushSubscription;

    type Error = UseCaseError;

    const NAME: &'static str = "Subscribe";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        for (field, value) in [
            ("userId", &self.user_id),
            ("endpoint", &self.endpoint),
            ("p256dh", &self.p256dh),
            ("auth", &self.auth),
        ] {
            if value.trim().is_empty() {
                return Err(UseCaseError::MissingField(field));
            }
        }

        let subscription = PushSubscription::new(
            self.user_id.clone(),
            self.endpoint.clone(),
            self.p256dh.clone(),
            self.auth.clone(),
            self.user_agent.clone(),
            ctx.sys.get_timestamp_millis(),
        );

        let repo = &ctx.repos.push_subscriptions;
        match repo.find_by_endpoint(&self.endpoint).await {
            Some(mut existing) => {
                existing.renew(subscription);
                repo.save(&existing)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(existing)
            }
            None => {
                repo.insert(&subscription)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(subscription)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usecase(user_id: &str) -> SubscribeUseCase {
        SubscribeUseCase {
            user_id: user_id.into(),
            endpoint: "https://fcm.googleapis.com/fcm/send/abc".into(),
            p256dh: "p256dh".into(),
            auth: "auth".into(),
            user_agent: None,
        }
    }

    #[actix_web::test]
    async fn resubscribing_an_endpoint_keeps_its_id() {
        let ctx = DayfuseContext::create_inmemory();
        let first = execute(usecase("user-1"), &ctx).await.unwrap();
        ctx.repos
            .push_subscriptions
            .deactivate(&first.id)
            .await
            .unwrap();

        let second = execute(usecase("user-2"), &ctx).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.user_id, "user-2");
        assert!(second.is_active);
        assert_eq!(
            ctx.repos
                .push_subscriptions
                .find_active_by_user("user-2")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[actix_web::test]
    async fn rejects_missing_keys() {
        let ctx = DayfuseContext::create_inmemory();
        let mut usecase = usecase("user-1");
        usecase.auth = "".into();
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::MissingField("auth"));
    }
}
