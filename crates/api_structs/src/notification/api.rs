use crate::dtos::ScheduledNotificationDTO;
use dayfuse_domain::{ScheduledNotification, TaskId, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotificationResponse {
    pub notification: ScheduledNotificationDTO,
}

impl ScheduledNotificationResponse {
    pub fn new(notification: ScheduledNotification) -> Self {
        Self {
            notification: ScheduledNotificationDTO::new(notification),
        }
    }
}

pub mod schedule_notification {
    use super::*;

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: String,
        pub task_id: TaskId,
        pub title: String,
        pub body: String,
        pub scheduled_time: i64,
    }

    pub type APIResponse = ScheduledNotificationResponse;
}

pub mod cancel_notification {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub notification_id: ID,
    }

    pub type APIResponse = ScheduledNotificationResponse;
}

pub mod get_user_notifications {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: String,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<ScheduledNotificationDTO>,
    }

    impl APIResponse {
        pub fn new(notifications: Vec<ScheduledNotification>) -> Self {
            Self {
                notifications: notifications
                    .into_iter()
                    .map(ScheduledNotificationDTO::new)
                    .collect(),
            }
        }
    }
}
