use crate::error::TransportError;
use crate::platform::PushKeys;
use async_trait::async_trait;
use dayfuse_domain::{NotificationPayload, ID};
use dayfuse_sdk::{DayfuseSDK, ScheduleNotificationInput, SendTestPushInput, SubscribeInput};

/// The calls the reminder system makes to the push relay
#[async_trait]
pub trait IRelayTransport: Send + Sync {
    async fn vapid_public_key(&self) -> Result<String, TransportError>;
    async fn register_subscription(&self, user_id: &str, keys: &PushKeys) -> Result<ID, TransportError>;
    async fn schedule_notification(
        &self,
        user_id: &str,
        payload: &NotificationPayload,
        scheduled_time: i64,
    ) -> Result<ID, TransportError>;
    async fn cancel_notification(&self, notification_id: &ID) -> Result<(), TransportError>;
    /// Number of devices the test push reached
    async fn send_test(&self, user_id: &str) -> Result<usize, TransportError>;
}

#[async_trait]
impl IRelayTransport for DayfuseSDK {
    async fn vapid_public_key(&self) -> Result<String, TransportError> {
        let res = self.push.vapid_public_key().await?;
        Ok(res.public_key)
    }

    async fn register_subscription(&self, user_id: &str, keys: &PushKeys) -> Result<ID, TransportError> {
        let input = SubscribeInput {
            user_id: user_id.to_string(),
            endpoint: keys.endpoint.clone(),
            p256dh: keys.p256dh.clone(),
            auth: keys.auth.clone(),
            user_agent: keys.user_agent.clone(),
        };
        let res = self.push.subscribe(input).await?;
        Ok(res.subscription_id)
    }

    async fn schedule_notification(
        &self,
        user_id: &str,
        payload: &NotificationPayload,
        scheduled_time: i64,
    ) -> Result<ID, TransportError> {
        let input = ScheduleNotificationInput {
            user_id: user_id.to_string(),
            task_id: payload.task_id.clone(),
            title: payload.title.clone(),
            body: payload.body.clone(),
            scheduled_time,
        };
        let res = self.notification.schedule(input).await?;
        Ok(res.notification.id)
    }

    async fn cancel_notification(&self, notification_id: &ID) -> Result<(), TransportError> {
        self.notification.cancel(notification_id).await?;
        Ok(())
    }

    async fn send_test(&self, user_id: &str) -> Result<usize, TransportError> {
        let res = self
            .push
            .send_test(SendTestPushInput {
                user_id: user_id.to_string(),
                title: None,
                body: None,
            })
            .await?;
        Ok(res.sent)
    }
}
