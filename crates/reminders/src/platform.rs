use crate::error::PlatformError;
use async_trait::async_trait;
use dayfuse_domain::{DeviceCapability, NotificationPayload, PermissionState};
use serde::Serialize;

/// Keys of a push subscription created by the browser push manager
#[derive(Debug, Clone, PartialEq)]
pub struct PushKeys {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_agent: Option<String>,
}

/// Capability detection and permission handling of the device
#[async_trait]
pub trait IPlatform: Send + Sync {
    /// What the device supports. Only read once per session unless refreshed.
    fn capabilities(&self) -> DeviceCapability;
    /// The permission state right now
    fn permission(&self) -> PermissionState;
    async fn request_permission(&self) -> Result<PermissionState, PlatformError>;
    async fn subscribe_push(&self, vapid_public_key: &str) -> Result<PushKeys, PlatformError>;
}

/// The Notification API of the page
pub trait INotifier: Send + Sync {
    fn show(&self, tag: &str, payload: &NotificationPayload) -> Result<(), PlatformError>;
}

/// Message posted to the active service worker, which displays it with the
/// icon and actions of the app.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tag: String,
    pub payload: NotificationPayload,
    pub actions: Vec<&'static str>,
}

impl ServiceWorkerMessage {
    pub fn show_notification(tag: String, payload: NotificationPayload) -> Self {
        Self {
            kind: "SHOW_NOTIFICATION",
            tag,
            payload,
            actions: vec!["snooze", "complete"],
        }
    }
}

pub trait IServiceWorker: Send + Sync {
    fn post_message(&self, message: ServiceWorkerMessage) -> Result<(), PlatformError>;
}

/// Persistent scheduled notifications of a mobile OS, addressed by identifier
#[async_trait]
pub trait INativeNotificationCenter: Send + Sync {
    async fn schedule(
        &self,
        identifier: &str,
        trigger_at: i64,
        payload: &NotificationPayload,
    ) -> Result<(), PlatformError>;
    /// Cancelling an unknown identifier is not an error
    async fn cancel(&self, identifier: &str) -> Result<(), PlatformError>;
}
