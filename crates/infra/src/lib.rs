mod config;
mod repos;
mod services;

pub use config::{Config, VapidConfig};
pub use dayfuse_domain::{ISys, RealSys};
pub use repos::{DeleteResult, IPushSubscriptionRepo, IScheduledNotificationRepo, ITaskRepo, Repos};
pub use services::*;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct DayfuseContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub push: Arc<dyn IPushProvider>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl DayfuseContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string).await?,
            None => {
                warn!("DATABASE_URL is not set. Tasks and notifications are kept in memory and lost on restart.");
                Repos::create_inmemory()
            }
        };
        let config = Config::new();
        let push = Arc::new(WebPushProvider::new(
            config.vapid.clone(),
            config.push_ttl_secs,
        ));
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            push,
        })
    }

    /// Context with in-memory repositories and a push provider that records
    /// messages instead of sending them
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            push: Arc::new(RecordingPushProvider::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<DayfuseContext> {
    DayfuseContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).ok()
}

/// An inmemory context, plus a postgres context when `DATABASE_URL` is set
#[cfg(test)]
pub(crate) async fn create_test_contexts() -> Vec<DayfuseContext> {
    let mut contexts = vec![DayfuseContext::create_inmemory()];
    if get_psql_connection_string().is_some() {
        contexts.push(
            setup_context()
                .await
                .expect("Postgres credentials must be valid"),
        );
    }
    contexts
}
