mod inmemory;
mod postgres;

use dayfuse_domain::{RemoteTask, TaskId};
pub use inmemory::InMemoryTaskRepo;
pub use postgres::PostgresTaskRepo;

#[async_trait::async_trait]
pub trait ITaskRepo: Send + Sync {
    async fn insert(&self, task: &RemoteTask) -> anyhow::Result<()>;
    async fn save(&self, task: &RemoteTask) -> anyhow::Result<()>;
    async fn find(&self, task_id: &TaskId) -> Option<RemoteTask>;
    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<RemoteTask>>;
    async fn delete(&self, task_id: &TaskId) -> Option<RemoteTask>;
}
