use crate::{APIResponse, BaseClient, TaskId};
use dayfuse_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskClient {
    base: Arc<BaseClient>,
}

pub type CreateTaskInput = create_task::RequestBody;

pub struct UpdateTaskInput {
    pub task_id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_time: Option<i64>,
    pub completed: Option<bool>,
}

impl UpdateTaskInput {
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            description: None,
            due_time: None,
            completed: None,
        }
    }
}

impl TaskClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateTaskInput) -> APIResponse<create_task::APIResponse> {
        self.base
            .post(input, "tasks".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, task_id: &TaskId) -> APIResponse<get_task::APIResponse> {
        self.base
            .get(format!("tasks/{}", task_id), StatusCode::OK)
            .await
    }

    pub async fn get_by_user(&self, user_id: &str) -> APIResponse<get_user_tasks::APIResponse> {
        self.base
            .get(format!("users/{}/tasks", user_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateTaskInput) -> APIResponse<update_task::APIResponse> {
        let body = update_task::RequestBody {
            title: input.title,
            description: input.description,
            due_time: input.due_time,
            completed: input.completed,
        };
        self.base
            .patch(body, format!("tasks/{}", input.task_id), StatusCode::OK)
            .await
    }

    pub async fn delete(&self, task_id: &TaskId) -> APIResponse<delete_task::APIResponse> {
        self.base
            .delete(format!("tasks/{}", task_id), StatusCode::OK)
            .await
    }
}
