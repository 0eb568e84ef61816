use dayfuse_domain::{RemoteTask, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDTO {
    pub id: TaskId,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Timestamp in millis
    pub due_time: Option<i64>,
    pub completed: bool,
    pub created: i64,
    pub updated: i64,
}

impl TaskDTO {
    pub fn new(task: RemoteTask) -> Self {
        Self {
            id: task.id,
            user_id: task.user_id,
            title: task.title,
            description: task.description,
            due_time: task.due_time,
            completed: task.completed,
            created: task.created,
            updated: task.updated,
        }
    }
}
