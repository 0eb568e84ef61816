use crate::backends::{
    ArmRequest, CountdownBackend, DisplayTarget, DurableBackend, IDeliveryBackend,
    IDeliveryListener, NativeBackend,
};
use crate::config::SchedulerConfig;
use crate::error::{DeliveryError, SchedulingError};
use crate::fallback::CalendarFallback;
use crate::ledger::ReminderLedger;
use crate::platform::{
    INativeNotificationCenter, INotifier, IPlatform, IServiceWorker, ServiceWorkerMessage,
};
use crate::transport::IRelayTransport;
use dayfuse_domain::{
    select_channel, Channel, DeviceCapability, ISys, NotificationPayload, PermissionState,
    ReminderEntry, ReminderKey, ReminderState, Task, TaskId, ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const TEST_NOTIFICATION_TAG: &str = "dayfuse-test";

/// The platform pieces the scheduler works with. Anything a device does not
/// have is left out, and the channels needing it are never selected.
#[derive(Clone)]
pub struct PlatformServices {
    pub platform: Arc<dyn IPlatform>,
    pub notifier: Option<Arc<dyn INotifier>>,
    pub service_worker: Option<Arc<dyn IServiceWorker>>,
    pub native: Option<Arc<dyn INativeNotificationCenter>>,
    pub relay: Option<Arc<dyn IRelayTransport>>,
    pub sys: Arc<dyn ISys>,
}

/// Where and when a task reminder got armed
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderHandle {
    pub task_id: TaskId,
    pub channel: Channel,
    pub trigger_at: i64,
    /// `None` when follow ups are disabled or the follow up could not be armed
    pub follow_up_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoDueTime,
    MalformedDueTime,
    PastDue,
    Completed,
}

/// Outcome of `schedule_reminder`
#[derive(Debug, Clone, PartialEq)]
pub enum Scheduled {
    Armed(ReminderHandle),
    /// No reminder is needed for the task as it is now
    Skipped(SkipReason),
    /// No notification channel is usable, a calendar event is offered instead
    Fallback(CalendarFallback),
}

/// Buttons on a displayed reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Snooze { minutes: Option<u32> },
    Complete,
    Dismiss,
}

/// Keeps at most one primary and one follow up reminder armed per task.
///
/// Every operation cancels whatever is armed for the task before arming
/// anything new, and operations run one at a time so a cancel is never
/// overtaken by an earlier schedule.
pub struct ReminderScheduler {
    config: SchedulerConfig,
    services: PlatformServices,
    backends: HashMap<Channel, Arc<dyn IDeliveryBackend>>,
    ledger: Arc<ReminderLedger>,
    capability: Mutex<Option<DeviceCapability>>,
    subscription_id: Mutex<Option<ID>>,
    sequencer: tokio::sync::Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

impl ReminderScheduler {
    pub fn new(config: SchedulerConfig, services: PlatformServices) -> Self {
        let ledger = Arc::new(ReminderLedger::default());
        let listener: Arc<dyn IDeliveryListener> = ledger.clone();

        let mut backends: Vec<Arc<dyn IDeliveryBackend>> = Vec::new();
        if let Some(notifier) = &services.notifier {
            backends.push(Arc::new(CountdownBackend::new(
                DisplayTarget::Inline(notifier.clone()),
                listener.clone(),
                services.sys.clone(),
            )));
        }
        if let Some(worker) = &services.service_worker {
            backends.push(Arc::new(CountdownBackend::new(
                DisplayTarget::ServiceWorker(worker.clone()),
                listener.clone(),
                services.sys.clone(),
            )));
        }
        if let Some(center) = &services.native {
            backends.push(Arc::new(NativeBackend::new(center.clone())));
        }
        if let (Some(relay), Some(user_id)) = (&services.relay, &config.user_id) {
            backends.push(Arc::new(DurableBackend::new(relay.clone(), user_id.clone())));
        }

        Self {
            config,
            services,
            backends: backends
                .into_iter()
                .map(|backend| (backend.channel(), backend))
                .collect(),
            ledger,
            capability: Mutex::new(None),
            subscription_id: Mutex::new(None),
            sequencer: tokio::sync::Mutex::new(()),
        }
    }

    fn now(&self) -> i64 {
        self.services.sys.get_timestamp_millis()
    }

    /// Cached device capability with the live permission state
    fn current_capability(&self) -> DeviceCapability {
        let mut capability = lock(&self.capability)
            .get_or_insert_with(|| self.services.platform.capabilities())
            .clone();
        capability.permission = self.services.platform.permission();
        capability.has_push_subscription = lock(&self.subscription_id).is_some();
        capability
    }

    fn pick_channel(&self) -> (Channel, DeviceCapability) {
        let capability = self.current_capability();
        let channel = match select_channel(&capability) {
            channel if self.backends.contains_key(&channel) => channel,
            Channel::CalendarFallback => Channel::CalendarFallback,
            channel => {
                warn!("No delivery backend for channel {}", channel);
                Channel::CalendarFallback
            }
        };
        (channel, capability)
    }

    fn due_instant(&self, task: &Task) -> Result<i64, SkipReason> {
        if task.completed {
            return Err(SkipReason::Completed);
        }
        let due = match task.due_timestamp_millis(&self.config.tz) {
            Ok(Some(due)) => due,
            Ok(None) => return Err(SkipReason::NoDueTime),
            Err(e) => {
                warn!("Task {}: {}", task.id, e);
                return Err(SkipReason::MalformedDueTime);
            }
        };
        if due <= self.now() {
            return Err(SkipReason::PastDue);
        }
        Ok(due)
    }

    /// Arms the reminder for a task, replacing whatever was armed for it before.
    ///
    /// A task without a future due time is skipped, and the reminders armed
    /// by earlier calls are cancelled, so the task ends up with none. A
    /// failing backend also leaves the task without a reminder.
    pub async fn schedule_reminder(&self, task: &Task) -> Result<Scheduled, SchedulingError> {
        let _sequence = self.sequencer.lock().await;
        self.cancel_keys(&task.id).await;

        let due = match self.due_instant(task) {
            Ok(due) => due,
            Err(reason) => {
                info!("No reminder for task {}: {:?}", task.id, reason);
                return Ok(Scheduled::Skipped(reason));
            }
        };

        let (channel, capability) = self.pick_channel();
        if channel == Channel::CalendarFallback {
            return CalendarFallback::for_task(task, capability.guidance(), &self.config.tz, self.now())
                .map(Scheduled::Fallback)
                .map_err(|e| {
                    warn!("Calendar fallback for task {} failed: {}", task.id, e);
                    SchedulingError::UnsupportedPlatform
                });
        }

        let payload = NotificationPayload {
            task_id: task.id.clone(),
            title: task.title.clone(),
            body: task.reminder_body(),
        };
        self.arm_task(channel, payload, due).await.map(Scheduled::Armed)
    }

    /// Cancels both reminders of the task. Safe to call any number of times.
    pub async fn cancel_reminder(&self, task_id: &TaskId) {
        let _sequence = self.sequencer.lock().await;
        self.cancel_keys(task_id).await;
    }

    /// Moves the reminder of a task that has been scheduled before to a new time
    pub async fn reschedule_reminder(
        &self,
        task_id: &TaskId,
        new_trigger_at: i64,
    ) -> Result<ReminderHandle, SchedulingError> {
        let _sequence = self.sequencer.lock().await;
        let previous = self
            .ledger
            .entry(&ReminderKey::primary(task_id))
            .ok_or(SchedulingError::NothingToReschedule)?;
        if new_trigger_at <= self.now() {
            return Err(SchedulingError::TriggerInPast);
        }

        self.cancel_keys(task_id).await;
        match self.pick_channel() {
            (Channel::CalendarFallback, _) => Err(SchedulingError::UnsupportedPlatform),
            (channel, _) => self.arm_task(channel, previous.payload, new_trigger_at).await,
        }
    }

    pub async fn snooze(
        &self,
        task_id: &TaskId,
        minutes: Option<u32>,
    ) -> Result<ReminderHandle, SchedulingError> {
        let minutes = minutes.unwrap_or(self.config.snooze_minutes);
        let trigger_at = self.now() + i64::from(minutes) * 60 * 1000;
        self.reschedule_reminder(task_id, trigger_at).await
    }

    /// Reacts to a button pressed on a displayed reminder. Completing only
    /// clears the reminders, marking the task done is up to the task store.
    pub async fn handle_notification_action(
        &self,
        task_id: &TaskId,
        action: NotificationAction,
    ) -> Result<Option<ReminderHandle>, SchedulingError> {
        match action {
            NotificationAction::Snooze { minutes } => self.snooze(task_id, minutes).await.map(Some),
            NotificationAction::Complete => {
                self.cancel_reminder(task_id).await;
                Ok(None)
            }
            NotificationAction::Dismiss => {
                let _sequence = self.sequencer.lock().await;
                self.ledger.fire_current(&ReminderKey::primary(task_id));
                self.cancel_key(&ReminderKey::follow_up(task_id)).await;
                Ok(None)
            }
        }
    }

    /// Brings the reminders in line with a task that was created or edited.
    /// Returns whether a reminder is armed afterwards.
    pub async fn on_task_saved(&self, task: &Task) -> bool {
        match self.schedule_reminder(task).await {
            Ok(Scheduled::Armed(_)) => true,
            Ok(Scheduled::Skipped(_)) | Ok(Scheduled::Fallback(_)) => false,
            Err(e) => {
                warn!("Reminder for task {} could not be armed: {}", task.id, e);
                false
            }
        }
    }

    pub async fn on_task_completed(&self, task_id: &TaskId) {
        self.cancel_reminder(task_id).await;
    }

    pub async fn on_task_deleted(&self, task_id: &TaskId) {
        self.cancel_reminder(task_id).await;
    }

    /// Records that a reminder was displayed by a channel that can not report
    /// back by itself, e.g. a push message or an OS notification.
    pub fn mark_delivered(&self, key: &ReminderKey) -> bool {
        self.ledger.fire_current(key)
    }

    /// Reads the device capability again instead of using the cached one
    pub fn refresh_capabilities(&self) -> DeviceCapability {
        *lock(&self.capability) = Some(self.services.platform.capabilities());
        self.current_capability()
    }

    /// Subscribes the device to web push and registers the subscription with
    /// the relay, enabling server durable reminders.
    pub async fn register_push_subscription(&self) -> bool {
        match self.try_register_push_subscription().await {
            Ok(id) => {
                info!("Push subscription {} registered", id);
                true
            }
            Err(e) => {
                warn!("Push subscription registration failed: {}", e);
                false
            }
        }
    }

    async fn try_register_push_subscription(&self) -> Result<ID, SchedulingError> {
        let relay = self
            .services
            .relay
            .as_ref()
            .ok_or(SchedulingError::UnsupportedPlatform)?;
        let user_id = self.config.user_id.as_ref().ok_or_else(|| {
            SchedulingError::SubscriptionRegistrationFailed("No signed in user".into())
        })?;

        let capability = self.current_capability();
        if capability.permission != PermissionState::Granted {
            return Err(SchedulingError::PermissionDenied);
        }
        if !capability.supports_web_push() {
            return Err(SchedulingError::UnsupportedPlatform);
        }

        let failed = |e: String| SchedulingError::SubscriptionRegistrationFailed(e);
        let public_key = relay
            .vapid_public_key()
            .await
            .map_err(|e| failed(e.to_string()))?;
        let keys = self
            .services
            .platform
            .subscribe_push(&public_key)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let id = relay
            .register_subscription(user_id, &keys)
            .await
            .map_err(|e| failed(e.to_string()))?;

        *lock(&self.subscription_id) = Some(id.clone());
        Ok(id)
    }

    /// Pending entries of a task, primary first
    pub fn pending_entries(&self, task_id: &TaskId) -> Vec<ReminderEntry> {
        self.ledger.pending(task_id)
    }

    pub async fn schedule_task_reminder(&self, task: &Task) -> bool {
        match self.schedule_reminder(task).await {
            Ok(Scheduled::Armed(_)) => true,
            Ok(_) => false,
            Err(e) => {
                warn!("Reminder for task {} could not be armed: {}", task.id, e);
                false
            }
        }
    }

    pub async fn cancel_notification(&self, task_id: &TaskId) {
        self.cancel_reminder(task_id).await;
    }

    /// Asks the user for notification permission. The channel is selected
    /// again on the next schedule either way.
    pub async fn request_permission(&self) -> bool {
        let res = self.services.platform.request_permission().await;
        *lock(&self.capability) = None;
        match res {
            Ok(permission) => permission == PermissionState::Granted,
            Err(e) => {
                warn!("Permission request failed: {}", e);
                false
            }
        }
    }

    /// Shows a notification right away through the channel reminders would use
    pub async fn send_test_notification(&self) -> bool {
        match self.try_send_test_notification().await {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!("Test notification failed: {}", e);
                false
            }
        }
    }

    async fn try_send_test_notification(&self) -> Result<bool, SchedulingError> {
        let (channel, capability) = self.pick_channel();
        let payload = NotificationPayload {
            task_id: TaskId::new(TEST_NOTIFICATION_TAG),
            title: "DayFuse test notification".into(),
            body: "Reminders are working on this device".into(),
        };
        let unsupported = || SchedulingError::UnsupportedPlatform;

        match channel {
            Channel::ServerDurable => {
                let relay = self.services.relay.as_ref().ok_or_else(unsupported)?;
                let user_id = self.config.user_id.as_ref().ok_or_else(unsupported)?;
                let sent = relay
                    .send_test(user_id)
                    .await
                    .map_err(DeliveryError::from)?;
                Ok(sent > 0)
            }
            Channel::NativeOs => {
                let center = self.services.native.as_ref().ok_or_else(unsupported)?;
                center
                    .schedule(TEST_NOTIFICATION_TAG, self.now(), &payload)
                    .await
                    .map_err(DeliveryError::from)?;
                Ok(true)
            }
            Channel::ServiceWorker => {
                let worker = self.services.service_worker.as_ref().ok_or_else(unsupported)?;
                worker
                    .post_message(ServiceWorkerMessage::show_notification(
                        TEST_NOTIFICATION_TAG.into(),
                        payload,
                    ))
                    .map_err(DeliveryError::from)?;
                Ok(true)
            }
            Channel::LocalTimer => {
                let notifier = self.services.notifier.as_ref().ok_or_else(unsupported)?;
                notifier
                    .show(TEST_NOTIFICATION_TAG, &payload)
                    .map_err(DeliveryError::from)?;
                Ok(true)
            }
            Channel::CalendarFallback if capability.permission != PermissionState::Granted => {
                Err(SchedulingError::PermissionDenied)
            }
            Channel::CalendarFallback => Err(SchedulingError::UnsupportedPlatform),
        }
    }

    /// Arms the primary reminder and, when enabled, the follow up. Only a
    /// failing primary is an error.
    async fn arm_task(
        &self,
        channel: Channel,
        payload: NotificationPayload,
        trigger_at: i64,
    ) -> Result<ReminderHandle, SchedulingError> {
        let backend = self
            .backends
            .get(&channel)
            .ok_or(SchedulingError::UnsupportedPlatform)?;
        let task_id = payload.task_id.clone();

        self.arm_entry(
            backend.as_ref(),
            ReminderKey::primary(&task_id),
            trigger_at,
            payload.clone(),
        )
        .await
        .map_err(|e| {
            warn!("Arming reminder for task {} on {} failed: {}", task_id, channel, e);
            SchedulingError::from(e)
        })?;

        let follow_up_at = match self.config.follow_up_delay_millis {
            Some(delay) => {
                let at = trigger_at + delay;
                let key = ReminderKey::follow_up(&task_id);
                match self.arm_entry(backend.as_ref(), key, at, payload).await {
                    Ok(()) => Some(at),
                    Err(e) => {
                        warn!("Arming follow up for task {} failed: {}", task_id, e);
                        None
                    }
                }
            }
            None => None,
        };

        info!("Reminder for task {} armed on {}", task_id, channel);
        Ok(ReminderHandle {
            task_id,
            channel,
            trigger_at,
            follow_up_at,
        })
    }

    async fn arm_entry(
        &self,
        backend: &dyn IDeliveryBackend,
        key: ReminderKey,
        trigger_at: i64,
        payload: NotificationPayload,
    ) -> Result<(), DeliveryError> {
        let generation = self.ledger.next_generation();
        self.ledger.insert(ReminderEntry {
            key: key.clone(),
            trigger_at,
            channel: backend.channel(),
            state: ReminderState::Pending,
            payload: payload.clone(),
            generation,
        });

        let request = ArmRequest {
            key: key.clone(),
            generation,
            trigger_at,
            payload,
        };
        match backend.arm(request).await {
            Ok(handle) => {
                if !self.ledger.attach(&key, generation, handle) {
                    debug!("Reminder {} fired before arming completed", key);
                }
                Ok(())
            }
            Err(e) => {
                self.ledger.discard(&key, generation);
                Err(e)
            }
        }
    }

    async fn cancel_keys(&self, task_id: &TaskId) {
        for key in ReminderKey::all_for(task_id).iter() {
            self.cancel_key(key).await;
        }
    }

    async fn cancel_key(&self, key: &ReminderKey) {
        let (entry, handle) = match self.ledger.cancel(key) {
            Some(cancelled) => cancelled,
            None => return,
        };
        let backend = match self.backends.get(&entry.channel) {
            Some(backend) => backend,
            None => return,
        };
        if let Err(e) = backend.disarm(handle).await {
            warn!("Disarming reminder {} failed: {}", key, e);
        }
    }
}
