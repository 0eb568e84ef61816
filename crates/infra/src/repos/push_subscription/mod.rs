mod inmemory;
mod postgres;

use dayfuse_domain::{PushSubscription, ID};
pub use inmemory::InMemoryPushSubscriptionRepo;
pub use postgres::PostgresPushSubscriptionRepo;

#[async_trait::async_trait]
pub trait IPushSubscriptionRepo: Send + Sync {
    async fn insert(&self, subscription: &PushSubscription) -> anyhow::Result<()>;
    async fn save(&self, subscription: &PushSubscription) -> anyhow::Result<()>;
    async fn find(&self, subscription_id: &ID) -> Option<PushSubscription>;
    async fn find_by_endpoint(&self, endpoint: &str) -> Option<PushSubscription>;
    async fn find_active_by_user(&self, user_id: &str) -> anyhow::Result<Vec<PushSubscription>>;
    async fn delete(&self, subscription_id: &ID) -> Option<PushSubscription>;
    /// Marks the subscription as no longer reachable
    async fn deactivate(&self, subscription_id: &ID) -> anyhow::Result<()>;
}
