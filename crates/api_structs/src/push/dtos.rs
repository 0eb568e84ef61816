use dayfuse_domain::{PushSubscription, ID};
use serde::{Deserialize, Serialize};

/// A push subscription without its key material
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionDTO {
    pub id: ID,
    pub user_id: String,
    pub endpoint: String,
    pub user_agent: Option<String>,
    pub is_active: bool,
    pub created: i64,
}

impl PushSubscriptionDTO {
    pub fn new(subscription: PushSubscription) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            endpoint: subscription.endpoint,
            user_agent: subscription.user_agent,
            is_active: subscription.is_active,
            created: subscription.created,
        }
    }
}
