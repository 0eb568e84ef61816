use super::{ArmRequest, BackendHandle, IDeliveryBackend};
use crate::error::DeliveryError;
use crate::platform::INativeNotificationCenter;
use async_trait::async_trait;
use dayfuse_domain::Channel;
use std::sync::Arc;

/// Hands reminders to the scheduled notifications of the mobile OS.
///
/// The OS identifier is the reminder key, so arming the same key twice
/// replaces the earlier notification instead of adding a second one.
pub struct NativeBackend {
    center: Arc<dyn INativeNotificationCenter>,
}

impl NativeBackend {
    pub fn new(center: Arc<dyn INativeNotificationCenter>) -> Self {
        Self { center }
    }
}

#[async_trait]
impl IDeliveryBackend for NativeBackend {
    fn channel(&self) -> Channel {
        Channel::NativeOs
    }

    async fn arm(&self, request: ArmRequest) -> Result<BackendHandle, DeliveryError> {
        let identifier = request.key.to_string();
        self.center.cancel(&identifier).await?;
        self.center
            .schedule(&identifier, request.trigger_at, &request.payload)
            .await?;
        Ok(BackendHandle::Native(identifier))
    }

    async fn disarm(&self, handle: BackendHandle) -> Result<(), DeliveryError> {
        match handle {
            BackendHandle::Native(identifier) => {
                self.center.cancel(&identifier).await?;
                Ok(())
            }
            _ => Err(DeliveryError::ForeignHandle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{payload, RecordingNativeCenter};
    use dayfuse_domain::ReminderKey;

    #[tokio::test]
    async fn repeated_arm_keeps_one_os_entry() {
        let center = Arc::new(RecordingNativeCenter::default());
        let backend = NativeBackend::new(center.clone());
        let payload = payload("task");
        let request = ArmRequest {
            key: ReminderKey::follow_up(&payload.task_id),
            generation: 1,
            trigger_at: 100,
            payload,
        };

        backend.arm(request.clone()).await.unwrap();
        let handle = backend
            .arm(ArmRequest {
                trigger_at: 200,
                ..request
            })
            .await
            .unwrap();
        assert_eq!(center.scheduled(), vec![("task:followup".to_string(), 200)]);

        backend.disarm(handle).await.unwrap();
        assert!(center.scheduled().is_empty());
    }
}
