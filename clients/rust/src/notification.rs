use crate::{APIResponse, BaseClient, ID};
use dayfuse_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationClient {
    base: Arc<BaseClient>,
}

pub type ScheduleNotificationInput = schedule_notification::RequestBody;

impl NotificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn schedule(
        &self,
        input: ScheduleNotificationInput,
    ) -> APIResponse<schedule_notification::APIResponse> {
        self.base
            .post(input, "notifications".into(), StatusCode::CREATED)
            .await
    }

    pub async fn cancel(&self, notification_id: &ID) -> APIResponse<cancel_notification::APIResponse> {
        self.base
            .delete(format!("notifications/{}", notification_id), StatusCode::OK)
            .await
    }

    pub async fn get_by_user(&self, user_id: &str) -> APIResponse<get_user_notifications::APIResponse> {
        self.base
            .get(format!("users/{}/notifications", user_id), StatusCode::OK)
            .await
    }
}
