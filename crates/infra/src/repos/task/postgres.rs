use super::ITaskRepo;
use dayfuse_domain::{RemoteTask, TaskId};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresTaskRepo {
    pool: PgPool,
}

impl PostgresTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRaw {
    task_id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    due_time: Option<i64>,
    completed: bool,
    created: i64,
    updated: i64,
}

impl From<TaskRaw> for RemoteTask {
    fn from(e: TaskRaw) -> Self {
        Self {
            id: e.task_id.into(),
            user_id: e.user_id,
            title: e.title,
            description: e.description,
            due_time: e.due_time,
            completed: e.completed,
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for PostgresTaskRepo {
    async fn insert(&self, task: &RemoteTask) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks
            (task_id, user_id, title, description, due_time, completed, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(task.id.as_str())
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_time)
        .bind(task.completed)
        .bind(task.created)
        .bind(task.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert task: {:?}. DB returned error: {:?}",
                task, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, task: &RemoteTask) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2,
            description = $3,
            due_time = $4,
            completed = $5,
            updated = $6
            WHERE task_id = $1
            "#,
        )
        .bind(task.id.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_time)
        .bind(task.completed)
        .bind(task.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save task: {:?}. DB returned error: {:?}", task, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, task_id: &TaskId) -> Option<RemoteTask> {
        let res: Option<TaskRaw> = sqlx::query_as(
            r#"
            SELECT * FROM tasks
            WHERE task_id = $1
            "#,
        )
        .bind(task_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find task with id: {:?} failed. DB returned error: {:?}",
                task_id, e
            );
            e
        })
        .ok()?;
        res.map(|task| task.into())
    }

    async fn find_by_user(&self, user_id: &str) -> anyhow::Result<Vec<RemoteTask>> {
        let tasks: Vec<TaskRaw> = sqlx::query_as(
            r#"
            SELECT * FROM tasks
            WHERE user_id = $1
            ORDER BY created
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find tasks for user: {:?} failed. DB returned error: {:?}",
                user_id, e
            );
            e
        })?;
        Ok(tasks.into_iter().map(|task| task.into()).collect())
    }

    async fn delete(&self, task_id: &TaskId) -> Option<RemoteTask> {
        let res: Option<TaskRaw> = sqlx::query_as(
            r#"
            DELETE FROM tasks
            WHERE task_id = $1
            RETURNING *
            "#,
        )
        .bind(task_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete task with id: {:?} failed. DB returned error: {:?}",
                task_id, e
            );
            e
        })
        .ok()?;
        res.map(|task| task.into())
    }
}
