use super::{ArmRequest, BackendHandle, IDeliveryBackend};
use crate::error::{DeliveryError, TransportError};
use crate::transport::IRelayTransport;
use async_trait::async_trait;
use dayfuse_domain::Channel;
use std::sync::Arc;
use tracing::debug;

/// Stores the reminder as a scheduled notification on the relay, which
/// delivers it with Web Push even when no client is running.
pub struct DurableBackend {
    relay: Arc<dyn IRelayTransport>,
    user_id: String,
}

impl DurableBackend {
    pub fn new(relay: Arc<dyn IRelayTransport>, user_id: String) -> Self {
        Self { relay, user_id }
    }
}

#[async_trait]
impl IDeliveryBackend for DurableBackend {
    fn channel(&self) -> Channel {
        Channel::ServerDurable
    }

    async fn arm(&self, request: ArmRequest) -> Result<BackendHandle, DeliveryError> {
        let id = self
            .relay
            .schedule_notification(&self.user_id, &request.payload, request.trigger_at)
            .await?;
        Ok(BackendHandle::Durable(id))
    }

    async fn disarm(&self, handle: BackendHandle) -> Result<(), DeliveryError> {
        let id = match handle {
            BackendHandle::Durable(id) => id,
            _ => return Err(DeliveryError::ForeignHandle),
        };
        match self.relay.cancel_notification(&id).await {
            // Already sent or cancelled
            Err(TransportError::NotFound) => {
                debug!("Scheduled notification {} was no longer pending", id);
                Ok(())
            }
            res => res.map_err(DeliveryError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{payload, FakeRelay};
    use dayfuse_domain::ReminderKey;

    #[tokio::test]
    async fn arms_and_disarms_on_relay() {
        let relay = Arc::new(FakeRelay::default());
        let backend = DurableBackend::new(relay.clone(), "user".into());
        let payload = payload("task");

        let handle = backend
            .arm(ArmRequest {
                key: ReminderKey::primary(&payload.task_id),
                generation: 1,
                trigger_at: 500,
                payload,
            })
            .await
            .unwrap();
        assert_eq!(relay.pending_times(), vec![500]);

        let id = match handle {
            BackendHandle::Durable(id) => id,
            other => panic!("Expected durable handle, got {:?}", other),
        };
        backend.disarm(BackendHandle::Durable(id.clone())).await.unwrap();
        assert!(relay.pending_times().is_empty());
        // Disarming again finds nothing on the relay and is still fine
        assert!(backend.disarm(BackendHandle::Durable(id)).await.is_ok());
    }

    #[tokio::test]
    async fn failed_cancel_is_not_treated_as_already_sent() {
        let relay = Arc::new(FakeRelay::default());
        let backend = DurableBackend::new(relay.clone(), "user".into());
        let payload = payload("task");
        let handle = backend
            .arm(ArmRequest {
                key: ReminderKey::primary(&payload.task_id),
                generation: 1,
                trigger_at: 500,
                payload,
            })
            .await
            .unwrap();

        relay.set_unreachable(true);
        assert_eq!(
            backend.disarm(handle).await.unwrap_err(),
            DeliveryError::Transport(TransportError::Unreachable)
        );
        assert_eq!(relay.pending_times(), vec![500]);
    }

    #[tokio::test]
    async fn relay_failure_is_reported() {
        let relay = Arc::new(FakeRelay::default());
        relay.set_unreachable(true);
        let backend = DurableBackend::new(relay, "user".into());
        let payload = payload("task");

        let res = backend
            .arm(ArmRequest {
                key: ReminderKey::primary(&payload.task_id),
                generation: 1,
                trigger_at: 500,
                payload,
            })
            .await;
        assert_eq!(
            res.unwrap_err(),
            DeliveryError::Transport(TransportError::Unreachable)
        );
    }
}
