use super::ITaskRepo;
use crate::repos::shared::inmemory_repo::*;
use dayfuse_domain::{RemoteTask, TaskId};

pub struct InMemoryTaskRepo {
    tasks: std::sync::Mutex<Vec<RemoteTask>>,
}

impl InMemoryTaskRepo {
    pub fn new() -> Self {
        Self {
            tasks: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for InMemoryTaskRepo {
    async fn insert(&self, task: &RemoteTask) -> anyhow::Result<()> {
        insert(task, &self.tasks);
        Ok(())
    }

    async fn save(&self, task: &RemoteTask) -> anyhow::Result<()> {
        save(task, &self.tasks);
        Ok(())
    }

    async fn find(&self, task_id: &TaskId) -> Option<RemoteTask> {
        find(task_id, &self.tasks)
    }

    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<RemoteTask>> {
        let mut tasks = find_by(&self.tasks, |t| t.user_id == user_id);
        tasks.sort_by_key(|t| t.created);
        Ok(tasks)
    }

    async fn delete(&self, task_id: &TaskId) -> Option<RemoteTask> {
        delete(task_id, &self.tasks)
    }
}
