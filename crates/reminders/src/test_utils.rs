use crate::backends::IDeliveryListener;
use crate::error::{PlatformError, TransportError};
use crate::platform::{
    INativeNotificationCenter, INotifier, IPlatform, IServiceWorker, PushKeys,
    ServiceWorkerMessage,
};
use crate::transport::IRelayTransport;
use async_trait::async_trait;
use dayfuse_domain::{
    DeviceCapability, ISys, NotificationPayload, PermissionState, ReminderKey, TaskId, ID,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

pub fn payload(task_id: &str) -> NotificationPayload {
    NotificationPayload {
        task_id: TaskId::new(task_id),
        title: "Water plants".into(),
        body: "Due at 09:00".into(),
    }
}

/// Clock frozen at a given instant
pub struct StaticSys {
    now: AtomicI64,
}

impl StaticSys {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }
}

impl ISys for StaticSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingListener {
    delivered: Mutex<Vec<(ReminderKey, u64)>>,
}

impl RecordingListener {
    pub fn delivered(&self) -> Vec<(ReminderKey, u64)> {
        lock(&self.delivered).clone()
    }
}

impl IDeliveryListener for RecordingListener {
    fn delivered(&self, key: &ReminderKey, generation: u64) {
        lock(&self.delivered).push((key.clone(), generation));
    }
}

/// Records the tags of shown notifications
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<String> {
        lock(&self.shown).clone()
    }
}

impl INotifier for RecordingNotifier {
    fn show(&self, tag: &str, _payload: &NotificationPayload) -> Result<(), PlatformError> {
        lock(&self.shown).push(tag.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingServiceWorker {
    messages: Mutex<Vec<ServiceWorkerMessage>>,
}

impl RecordingServiceWorker {
    pub fn messages(&self) -> Vec<ServiceWorkerMessage> {
        lock(&self.messages).clone()
    }
}

impl IServiceWorker for RecordingServiceWorker {
    fn post_message(&self, message: ServiceWorkerMessage) -> Result<(), PlatformError> {
        lock(&self.messages).push(message);
        Ok(())
    }
}

/// OS notification scheduler keeping one entry per identifier
#[derive(Default)]
pub struct RecordingNativeCenter {
    scheduled: Mutex<Vec<(String, i64)>>,
    failing: Mutex<bool>,
}

impl RecordingNativeCenter {
    pub fn scheduled(&self) -> Vec<(String, i64)> {
        let mut scheduled = lock(&self.scheduled).clone();
        scheduled.sort();
        scheduled
    }

    pub fn set_failing(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }
}

#[async_trait]
impl INativeNotificationCenter for RecordingNativeCenter {
    async fn schedule(
        &self,
        identifier: &str,
        trigger_at: i64,
        _payload: &NotificationPayload,
    ) -> Result<(), PlatformError> {
        if *lock(&self.failing) {
            return Err(PlatformError::PermissionDenied);
        }
        lock(&self.scheduled).push((identifier.to_string(), trigger_at));
        Ok(())
    }

    async fn cancel(&self, identifier: &str) -> Result<(), PlatformError> {
        lock(&self.scheduled).retain(|(id, _)| id != identifier);
        Ok(())
    }
}

pub struct FakePlatform {
    capability: Mutex<DeviceCapability>,
    permission: Mutex<PermissionState>,
    grant_on_request: bool,
}

impl FakePlatform {
    pub fn new(capability: DeviceCapability) -> Self {
        let permission = capability.permission;
        Self {
            capability: Mutex::new(capability),
            permission: Mutex::new(permission),
            grant_on_request: true,
        }
    }

    /// A platform where the user declines every permission prompt
    pub fn declining(capability: DeviceCapability) -> Self {
        Self {
            grant_on_request: false,
            ..Self::new(capability)
        }
    }

    pub fn set_permission(&self, permission: PermissionState) {
        *lock(&self.permission) = permission;
    }

    pub fn set_capability(&self, capability: DeviceCapability) {
        *lock(&self.capability) = capability;
    }
}

#[async_trait]
impl IPlatform for FakePlatform {
    fn capabilities(&self) -> DeviceCapability {
        lock(&self.capability).clone()
    }

    fn permission(&self) -> PermissionState {
        *lock(&self.permission)
    }

    async fn request_permission(&self) -> Result<PermissionState, PlatformError> {
        if self.grant_on_request {
            self.set_permission(PermissionState::Granted);
        }
        Ok(self.permission())
    }

    async fn subscribe_push(&self, vapid_public_key: &str) -> Result<PushKeys, PlatformError> {
        if vapid_public_key.is_empty() {
            return Err(PlatformError::Failed("Missing application server key".into()));
        }
        Ok(PushKeys {
            endpoint: "https://push.example.com/device".into(),
            p256dh: "p256dh".into(),
            auth: "auth".into(),
            user_agent: Some("test".into()),
        })
    }
}

/// Relay keeping scheduled notifications in memory
#[derive(Default)]
pub struct FakeRelay {
    pending: Mutex<Vec<(ID, i64)>>,
    subscriptions: Mutex<Vec<PushKeys>>,
    unreachable: Mutex<bool>,
}

impl FakeRelay {
    pub fn pending_times(&self) -> Vec<i64> {
        let mut times = lock(&self.pending)
            .iter()
            .map(|(_, time)| *time)
            .collect::<Vec<_>>();
        times.sort_unstable();
        times
    }

    pub fn subscriptions(&self) -> usize {
        lock(&self.subscriptions).len()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        *lock(&self.unreachable) = unreachable;
    }

    fn check(&self) -> Result<(), TransportError> {
        if *lock(&self.unreachable) {
            Err(TransportError::Unreachable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IRelayTransport for FakeRelay {
    async fn vapid_public_key(&self) -> Result<String, TransportError> {
        self.check()?;
        Ok("BPublicKey".into())
    }

    async fn register_subscription(&self, _user_id: &str, keys: &PushKeys) -> Result<ID, TransportError> {
        self.check()?;
        lock(&self.subscriptions).push(keys.clone());
        Ok(ID::new())
    }

    async fn schedule_notification(
        &self,
        _user_id: &str,
        _payload: &NotificationPayload,
        scheduled_time: i64,
    ) -> Result<ID, TransportError> {
        self.check()?;
        let id = ID::new();
        lock(&self.pending).push((id.clone(), scheduled_time));
        Ok(id)
    }

    async fn cancel_notification(&self, notification_id: &ID) -> Result<(), TransportError> {
        self.check()?;
        let mut pending = lock(&self.pending);
        let before = pending.len();
        pending.retain(|(id, _)| id != notification_id);
        if pending.len() == before {
            Err(TransportError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn send_test(&self, _user_id: &str) -> Result<usize, TransportError> {
        self.check()?;
        Ok(self.subscriptions())
    }
}
