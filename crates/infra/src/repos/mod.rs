mod push_subscription;
mod scheduled_notification;
mod shared;
mod task;

pub use push_subscription::IPushSubscriptionRepo;
use push_subscription::{InMemoryPushSubscriptionRepo, PostgresPushSubscriptionRepo};
pub use scheduled_notification::IScheduledNotificationRepo;
use scheduled_notification::{
    InMemoryScheduledNotificationRepo, PostgresScheduledNotificationRepo,
};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use task::ITaskRepo;
use task::{InMemoryTaskRepo, PostgresTaskRepo};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub push_subscriptions: Arc<dyn IPushSubscriptionRepo>,
    pub tasks: Arc<dyn ITaskRepo>,
    pub scheduled_notifications: Arc<dyn IScheduledNotificationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB EXECUTING MIGRATION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB EXECUTING MIGRATION ... [done]");

        Ok(Self {
            push_subscriptions: Arc::new(PostgresPushSubscriptionRepo::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepo::new(pool.clone())),
            scheduled_notifications: Arc::new(PostgresScheduledNotificationRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            push_subscriptions: Arc::new(InMemoryPushSubscriptionRepo::new()),
            tasks: Arc::new(InMemoryTaskRepo::new()),
            scheduled_notifications: Arc::new(InMemoryScheduledNotificationRepo::new()),
        }
    }
}
