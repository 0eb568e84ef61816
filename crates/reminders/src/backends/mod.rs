mod countdown;
mod durable;
mod native;

pub use countdown::{CountdownBackend, DisplayTarget};
pub use durable::DurableBackend;
pub use native::NativeBackend;

use crate::error::DeliveryError;
use async_trait::async_trait;
use dayfuse_domain::{Channel, NotificationPayload, ReminderKey, ID};
use tokio::task::AbortHandle;

/// Everything a backend needs to arm one reminder
#[derive(Debug, Clone, PartialEq)]
pub struct ArmRequest {
    pub key: ReminderKey,
    pub generation: u64,
    pub trigger_at: i64,
    pub payload: NotificationPayload,
}

/// What a backend hands back from `arm` and expects again in `disarm`
#[derive(Debug)]
pub enum BackendHandle {
    /// In-page countdown
    Timer(AbortHandle),
    /// Identifier given to the OS notification scheduler
    Native(String),
    /// Scheduled notification stored on the relay
    Durable(ID),
}

/// A way of getting a notification in front of the user at a given time
#[async_trait]
pub trait IDeliveryBackend: Send + Sync {
    fn channel(&self) -> Channel;
    async fn arm(&self, request: ArmRequest) -> Result<BackendHandle, DeliveryError>;
    async fn disarm(&self, handle: BackendHandle) -> Result<(), DeliveryError>;
}

/// Told when a backend has displayed a reminder
pub trait IDeliveryListener: Send + Sync {
    fn delivered(&self, key: &ReminderKey, generation: u64);
}
