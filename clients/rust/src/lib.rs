mod base;
mod notification;
mod push;
mod status;
mod task;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use dayfuse_api_structs::dtos::*;
pub use dayfuse_domain::{TaskId, ID};
use notification::NotificationClient;
pub use notification::ScheduleNotificationInput;
use push::PushClient;
pub use push::{SendTestPushInput, SubscribeInput};
use status::StatusClient;
use std::sync::Arc;
use task::TaskClient;
pub use task::{CreateTaskInput, UpdateTaskInput};

pub use dayfuse_api_structs::dtos::PushSubscriptionDTO as PushSubscription;
pub use dayfuse_api_structs::dtos::ScheduledNotificationDTO as ScheduledNotification;
pub use dayfuse_api_structs::dtos::TaskDTO as Task;

/// DayFuse Relay SDK
///
/// The SDK contains methods for interacting with the DayFuse push relay
/// API. `address` is the base url of the api, e.g. `https://relay.dayfuse.app/api`.
#[derive(Clone)]
pub struct DayfuseSDK {
    pub notification: NotificationClient,
    pub push: PushClient,
    pub status: StatusClient,
    pub task: TaskClient,
}

impl DayfuseSDK {
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));
        let notification = NotificationClient::new(base.clone());
        let push = PushClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let task = TaskClient::new(base);

        Self {
            notification,
            push,
            status,
            task,
        }
    }
}
