use crate::{APIResponse, BaseClient, ID};
use dayfuse_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct PushClient {
    base: Arc<BaseClient>,
}

pub type SubscribeInput = subscribe::RequestBody;

pub struct SendTestPushInput {
    pub user_id: String,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PushClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn vapid_public_key(&self) -> APIResponse<get_vapid_public_key::APIResponse> {
        self.base
            .get("push/vapid-public-key".into(), StatusCode::OK)
            .await
    }

    pub async fn subscribe(&self, input: SubscribeInput) -> APIResponse<subscribe::APIResponse> {
        self.base
            .post(input, "push/subscribe".into(), StatusCode::CREATED)
            .await
    }

    pub async fn unsubscribe(&self, subscription_id: ID) -> APIResponse<unsubscribe::APIResponse> {
        self.base
            .delete(
                format!("push/unsubscribe/{}", subscription_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn send_test(&self, input: SendTestPushInput) -> APIResponse<send_test_push::APIResponse> {
        let body = send_test_push::RequestBody {
            title: input.title,
            body: input.body,
        };
        self.base
            .post(body, format!("push/test/{}", input.user_id), StatusCode::OK)
            .await
    }
}
