use crate::config::VapidConfig;
use dayfuse_domain::{PushSubscription, ScheduledNotification, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

/// Body of a push message as read by the service worker of the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    /// Notifications with the same tag replace each other on the device
    pub tag: String,
    pub task_id: Option<TaskId>,
}

impl PushPayload {
    pub fn test(title: String, body: String) -> Self {
        Self {
            title,
            body,
            tag: "dayfuse-test".into(),
            task_id: None,
        }
    }
}

impl From<&ScheduledNotification> for PushPayload {
    fn from(notification: &ScheduledNotification) -> Self {
        Self {
            title: notification.title.clone(),
            body: notification.body.clone(),
            tag: notification.task_id.to_string(),
            task_id: Some(notification.task_id.clone()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PushError {
    /// The push service no longer knows the subscription (404 / 410)
    #[error("The push subscription has expired or is no longer valid")]
    Gone,
    #[error("The push service rejected the message: {0}")]
    Rejected(String),
    #[error("Push notifications are not configured")]
    NotConfigured,
}

impl From<WebPushError> for PushError {
    fn from(e: WebPushError) -> Self {
        match e {
            WebPushError::EndpointNotValid { .. } | WebPushError::EndpointNotFound { .. } => {
                Self::Gone
            }
            e => Self::Rejected(e.to_string()),
        }
    }
}

/// Sends push messages to a single subscription
#[async_trait::async_trait]
pub trait IPushProvider: Send + Sync {
    /// Public application server key that browsers subscribe with
    fn public_key(&self) -> Option<String>;
    async fn send(&self, subscription: &PushSubscription, payload: &PushPayload) -> Result<(), PushError>;
}

/// Web Push (RFC 8030) provider signing its requests with VAPID
pub struct WebPushProvider {
    vapid: Option<VapidConfig>,
    ttl_secs: u32,
    client: HyperWebPushClient,
}

impl WebPushProvider {
    pub fn new(vapid: Option<VapidConfig>, ttl_secs: u32) -> Self {
        Self {
            vapid,
            ttl_secs,
            client: HyperWebPushClient::new(),
        }
    }
}

#[async_trait::async_trait]
impl IPushProvider for WebPushProvider {
    fn public_key(&self) -> Option<String> {
        self.vapid.as_ref().map(|vapid| vapid.public_key.clone())
    }

    async fn send(&self, subscription: &PushSubscription, payload: &PushPayload) -> Result<(), PushError> {
        let vapid = self.vapid.as_ref().ok_or(PushError::NotConfigured)?;
        let info = SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.p256dh.clone(),
            subscription.auth.clone(),
        );

        let mut signature = VapidSignatureBuilder::from_pem(vapid.private_key_pem.as_slice(), &info)?;
        signature.add_claim("sub", vapid.subject.as_str());
        let signature = signature.build()?;

        let content =
            serde_json::to_vec(payload).map_err(|e| PushError::Rejected(e.to_string()))?;
        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &content);
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.ttl_secs);
        let message = builder.build()?;

        self.client.send(message).await.map_err(|e| {
            warn!(
                "Push to subscription: {} failed: {:?}",
                subscription.id, e
            );
            PushError::from(e)
        })
    }
}

/// Push provider that keeps the messages instead of sending them.
/// Endpoints can be made to fail with a given error.
pub struct RecordingPushProvider {
    sent: Mutex<Vec<(String, PushPayload)>>,
    failures: Mutex<HashMap<String, PushError>>,
}

impl RecordingPushProvider {
    pub const PUBLIC_KEY: &'static str =
        "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail_endpoint(&self, endpoint: &str, error: PushError) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(endpoint.to_string(), error);
    }

    /// Endpoint and payload of every successful send, in order
    pub fn sent(&self) -> Vec<(String, PushPayload)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for RecordingPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushProvider for RecordingPushProvider {
    fn public_key(&self) -> Option<String> {
        Some(Self::PUBLIC_KEY.into())
    }

    async fn send(&self, subscription: &PushSubscription, payload: &PushPayload) -> Result<(), PushError> {
        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&subscription.endpoint)
            .cloned();
        if let Some(error) = failure {
            return Err(error);
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((subscription.endpoint.clone(), payload.clone()));
        Ok(())
    }
}
