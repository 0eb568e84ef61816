mod calendar_file;
mod capability;
mod channel;
mod date;
mod push_subscription;
mod reminder;
mod scheduled_notification;
mod shared;
mod task;

pub use calendar_file::{
    calendar_file_for, generate_calendar_event, google_calendar_url, outlook_calendar_url,
    CalendarFile, CalendarLinkError,
};
pub use capability::{DeviceCapability, IosVersion, PermissionState, PlatformGuidance};
pub use channel::{select_channel, Channel};
pub use date::{local_to_timestamp_millis, parse_due_time, timestamp_millis_to_local, DueTimeError};
pub use push_subscription::PushSubscription;
pub use reminder::{NotificationPayload, ReminderEntry, ReminderKey, ReminderKind, ReminderState};
pub use scheduled_notification::ScheduledNotification;
pub use shared::entity::{Entity, InvalidIDError, TaskId, ID};
pub use shared::sys::{ISys, RealSys};
pub use task::{RemoteTask, Task};
