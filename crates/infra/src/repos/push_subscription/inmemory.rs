use super::IPushSubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use dayfuse_domain::{PushSubscription, ID};

pub struct InMemoryPushSubscriptionRepo {
    subscriptions: std::sync::Mutex<Vec<PushSubscription>>,
}

impl InMemoryPushSubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for InMemoryPushSubscriptionRepo {
    async fn insert(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        if !find_by(&self.subscriptions, |s| s.endpoint == subscription.endpoint).is_empty() {
            return Err(anyhow::anyhow!(
                "Push subscription endpoint already exists: {}",
                subscription.endpoint
            ));
        }
        insert(subscription, &self.subscriptions);
        Ok(())
    }

    async fn save(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        save(subscription, &self.subscriptions);
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> Option<PushSubscription> {
        find(subscription_id, &self.subscriptions)
    }

    async fn find_by_endpoint(&self, endpoint: &str) -> Option<PushSubscription> {
        find_by(&self.subscriptions, |s| s.endpoint == endpoint)
            .into_iter()
            .next()
    }

    async fn find_active_by_user(&self, user_id: &str) -> anyhow::Result<Vec<PushSubscription>> {
        Ok(find_by(&self.subscriptions, |s| {
            s.is_active && s.user_id == user_id
        }))
    }

    async fn delete(&self, subscription_id: &ID) -> Option<PushSubscription> {
        delete(subscription_id, &self.subscriptions)
    }

    async fn deactivate(&self, subscription_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.subscriptions,
            |s| s.id == *subscription_id,
            |s| s.is_active = false,
        );
        Ok(())
    }
}
