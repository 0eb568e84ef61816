//! Client side reminders for DayFuse tasks.
//!
//! The `ReminderScheduler` turns saved tasks into reminders on the best
//! channel the device offers: durable push through the relay, OS scheduled
//! notifications, an in-page countdown, or a calendar file when nothing else
//! works.

mod backends;
mod config;
mod error;
mod fallback;
mod ledger;
mod platform;
mod scheduler;
#[cfg(test)]
mod test_utils;
mod transport;

pub use backends::{
    ArmRequest, BackendHandle, CountdownBackend, DisplayTarget, DurableBackend, IDeliveryBackend,
    IDeliveryListener, NativeBackend,
};
pub use config::{SchedulerConfig, DEFAULT_FOLLOW_UP_DELAY_MILLIS, DEFAULT_SNOOZE_MINUTES};
pub use error::{DeliveryError, PlatformError, SchedulingError, TransportError};
pub use fallback::CalendarFallback;
pub use ledger::ReminderLedger;
pub use platform::{
    INativeNotificationCenter, INotifier, IPlatform, IServiceWorker, PushKeys,
    ServiceWorkerMessage,
};
pub use scheduler::{
    NotificationAction, PlatformServices, ReminderHandle, ReminderScheduler, Scheduled,
    SkipReason,
};
pub use transport::IRelayTransport;
