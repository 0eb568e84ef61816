use crate::dtos::TaskDTO;
use dayfuse_domain::{RemoteTask, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task: TaskDTO,
}

impl TaskResponse {
    pub fn new(task: RemoteTask) -> Self {
        Self {
            task: TaskDTO::new(task),
        }
    }
}

pub mod create_task {
    use super::*;

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: String,
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub due_time: Option<i64>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod get_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: TaskId,
    }

    pub type APIResponse = TaskResponse;
}

pub mod get_user_tasks {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: String,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub tasks: Vec<TaskDTO>,
    }

    impl APIResponse {
        pub fn new(tasks: Vec<RemoteTask>) -> Self {
            Self {
                tasks: tasks.into_iter().map(TaskDTO::new).collect(),
            }
        }
    }
}

pub mod update_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: TaskId,
    }

    /// Fields left out are not changed
    #[derive(Deserialize, Serialize, Debug, Default, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub due_time: Option<i64>,
        #[serde(default)]
        pub completed: Option<bool>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod delete_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: TaskId,
    }

    pub type APIResponse = TaskResponse;
}
