use crate::dtos::PushSubscriptionDTO;
use dayfuse_domain::{PushSubscription, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionResponse {
    pub subscription: PushSubscriptionDTO,
}

impl PushSubscriptionResponse {
    pub fn new(subscription: PushSubscription) -> Self {
        Self {
            subscription: PushSubscriptionDTO::new(subscription),
        }
    }
}

pub mod get_vapid_public_key {
    use super::*;

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub public_key: String,
    }
}

pub mod subscribe {
    use super::*;

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: String,
        pub endpoint: String,
        pub p256dh: String,
        pub auth: String,
        #[serde(default)]
        pub user_agent: Option<String>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub subscription_id: ID,
    }
}

pub mod unsubscribe {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub subscription_id: ID,
    }

    pub type APIResponse = PushSubscriptionResponse;
}

pub mod send_test_push {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: String,
    }

    #[derive(Deserialize, Serialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub body: Option<String>,
    }

    #[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub sent: usize,
        pub failed: usize,
    }
}
