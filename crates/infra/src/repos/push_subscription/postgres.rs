use super::IPushSubscriptionRepo;
use dayfuse_domain::{PushSubscription, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresPushSubscriptionRepo {
    pool: PgPool,
}

impl PostgresPushSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PushSubscriptionRaw {
    subscription_uid: Uuid,
    user_id: String,
    endpoint: String,
    p256dh: String,
    auth: String,
    user_agent: Option<String>,
    is_active: bool,
    created: i64,
}

impl From<PushSubscriptionRaw> for PushSubscription {
    fn from(e: PushSubscriptionRaw) -> Self {
        Self {
            id: e.subscription_uid.into(),
            user_id: e.user_id,
            endpoint: e.endpoint,
            p256dh: e.p256dh,
            auth: e.auth,
            user_agent: e.user_agent,
            is_active: e.is_active,
            created: e.created,
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for PostgresPushSubscriptionRepo {
    async fn insert(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO push_subscriptions
            (subscription_uid, user_id, endpoint, p256dh, auth, user_agent, is_active, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(&subscription.user_id)
        .bind(&subscription.endpoint)
        .bind(&subscription.p256dh)
        .bind(&subscription.auth)
        .bind(&subscription.user_agent)
        .bind(subscription.is_active)
        .bind(subscription.created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert push subscription: {:?}. DB returned error: {:?}",
                subscription, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE push_subscriptions
            SET user_id = $2,
            endpoint = $3,
            p256dh = $4,
            auth = $5,
            user_agent = $6,
            is_active = $7
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(&subscription.user_id)
        .bind(&subscription.endpoint)
        .bind(&subscription.p256dh)
        .bind(&subscription.auth)
        .bind(&subscription.user_agent)
        .bind(subscription.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save push subscription: {:?}. DB returned error: {:?}",
                subscription, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> Option<PushSubscription> {
        let res: Option<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM push_subscriptions
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find push subscription with id: {:?} failed. DB returned error: {:?}",
                subscription_id, e
            );
            e
        })
        .ok()?;
        res.map(|sub| sub.into())
    }

    async fn find_by_endpoint(&self, endpoint: &str) -> Option<PushSubscription> {
        let res: Option<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM push_subscriptions
            WHERE endpoint = $1
            "#,
        )
        .bind(endpoint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find push subscription with endpoint: {:?} failed. DB returned error: {:?}",
                endpoint, e
            );
            e
        })
        .ok()?;
        res.map(|sub| sub.into())
    }

    async fn find_active_by_user(&self, user_id: &str) -> anyhow::Result<Vec<PushSubscription>> {
        let subscriptions: Vec<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM push_subscriptions
            WHERE user_id = $1 AND is_active
            ORDER BY created
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find active push subscriptions for user: {:?} failed. DB returned error: {:?}",
                user_id, e
            );
            e
        })?;
        Ok(subscriptions.into_iter().map(|sub| sub.into()).collect())
    }

    async fn delete(&self, subscription_id: &ID) -> Option<PushSubscription> {
        let res: Option<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            DELETE FROM push_subscriptions
            WHERE subscription_uid = $1
            RETURNING *
            "#,
        )
        .bind(subscription_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete push subscription with id: {:?} failed. DB returned error: {:?}",
                subscription_id, e
            );
            e
        })
        .ok()?;
        res.map(|sub| sub.into())
    }

    async fn deactivate(&self, subscription_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE push_subscriptions
            SET is_active = FALSE
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to deactivate push subscription: {:?}. DB returned error: {:?}",
                subscription_id, e
            );
            e
        })?;
        Ok(())
    }
}
