use super::{ArmRequest, BackendHandle, IDeliveryBackend, IDeliveryListener};
use crate::error::{DeliveryError, PlatformError};
use crate::platform::{INotifier, IServiceWorker, ServiceWorkerMessage};
use async_trait::async_trait;
use dayfuse_domain::{Channel, ISys};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Where a countdown sends the notification once it runs out
#[derive(Clone)]
pub enum DisplayTarget {
    /// Notification API called from the page
    Inline(Arc<dyn INotifier>),
    /// Structured message to the active service worker
    ServiceWorker(Arc<dyn IServiceWorker>),
}

impl DisplayTarget {
    fn show(&self, request: &ArmRequest) -> Result<(), PlatformError> {
        let tag = request.key.to_string();
        match self {
            Self::Inline(notifier) => notifier.show(&tag, &request.payload),
            Self::ServiceWorker(worker) => worker.post_message(
                ServiceWorkerMessage::show_notification(tag, request.payload.clone()),
            ),
        }
    }
}

/// Countdown running inside the app process.
///
/// The delay is measured from arm time, so a device that sleeps will fire
/// late. Everything is lost when the page or app goes away.
pub struct CountdownBackend {
    display: DisplayTarget,
    listener: Arc<dyn IDeliveryListener>,
    sys: Arc<dyn ISys>,
}

impl CountdownBackend {
    pub fn new(display: DisplayTarget, listener: Arc<dyn IDeliveryListener>, sys: Arc<dyn ISys>) -> Self {
        Self {
            display,
            listener,
            sys,
        }
    }
}

#[async_trait]
impl IDeliveryBackend for CountdownBackend {
    fn channel(&self) -> Channel {
        match self.display {
            DisplayTarget::Inline(_) => Channel::LocalTimer,
            DisplayTarget::ServiceWorker(_) => Channel::ServiceWorker,
        }
    }

    async fn arm(&self, request: ArmRequest) -> Result<BackendHandle, DeliveryError> {
        let delay = (request.trigger_at - self.sys.get_timestamp_millis()).max(0) as u64;
        let display = self.display.clone();
        let listener = self.listener.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            match display.show(&request) {
                Ok(()) => listener.delivered(&request.key, request.generation),
                Err(e) => warn!("Reminder {} could not be shown: {}", request.key, e),
            }
        });
        debug!("Countdown armed, firing in {} ms", delay);

        Ok(BackendHandle::Timer(task.abort_handle()))
    }

    async fn disarm(&self, handle: BackendHandle) -> Result<(), DeliveryError> {
        match handle {
            BackendHandle::Timer(timer) => {
                timer.abort();
                Ok(())
            }
            _ => Err(DeliveryError::ForeignHandle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{payload, RecordingListener, RecordingNotifier, StaticSys};
    use dayfuse_domain::ReminderKey;

    fn request(trigger_at: i64) -> ArmRequest {
        let payload = payload("task");
        ArmRequest {
            key: ReminderKey::primary(&payload.task_id),
            generation: 3,
            trigger_at,
            payload,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_countdown_runs_out() {
        let notifier = Arc::new(RecordingNotifier::default());
        let listener = Arc::new(RecordingListener::default());
        let backend = CountdownBackend::new(
            DisplayTarget::Inline(notifier.clone()),
            listener.clone(),
            Arc::new(StaticSys::new(1000)),
        );

        backend.arm(request(6000)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert!(notifier.shown().is_empty());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(notifier.shown(), vec!["task".to_string()]);
        assert_eq!(listener.delivered(), vec![(ReminderKey::primary(&"task".into()), 3)]);
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_countdown_never_fires() {
        let notifier = Arc::new(RecordingNotifier::default());
        let listener = Arc::new(RecordingListener::default());
        let backend = CountdownBackend::new(
            DisplayTarget::Inline(notifier.clone()),
            listener.clone(),
            Arc::new(StaticSys::new(0)),
        );

        let handle = backend.arm(request(5000)).await.unwrap();
        backend.disarm(handle).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10_000)).await;

        assert!(notifier.shown().is_empty());
        assert!(listener.delivered().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn service_worker_display_posts_message() {
        let worker = Arc::new(crate::test_utils::RecordingServiceWorker::default());
        let backend = CountdownBackend::new(
            DisplayTarget::ServiceWorker(worker.clone()),
            Arc::new(RecordingListener::default()),
            Arc::new(StaticSys::new(0)),
        );
        assert_eq!(backend.channel(), Channel::ServiceWorker);

        backend.arm(request(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let messages = worker.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, "SHOW_NOTIFICATION");
        assert_eq!(messages[0].tag, "task");
    }
}
