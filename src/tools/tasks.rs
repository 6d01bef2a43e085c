use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use super::{Toolkit, format_tasks};
use crate::auth::ToolContext;
use crate::http::{ApiError, Params, path_segment};

/// Optional filters for [`Toolkit::list_tasks`]. When `filter` is set the API
/// gives it precedence over the other fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    /// Todoist filter query, e.g. `today` or `p1`.
    pub filter: Option<String>,
    pub label: Option<String>,
    /// IETF language tag used to parse `filter`.
    pub lang: Option<String>,
}

impl TaskFilter {
    fn to_params(&self) -> Params {
        Params::new()
            .insert("project_id", self.project_id.clone())
            .insert("filter", self.filter.clone())
            .insert("label", self.label.clone())
            .insert("lang", self.lang.clone())
    }
}

/// Fields for [`Toolkit::add_task`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub content: String,
    pub project_id: Option<String>,
    /// Natural language due date, e.g. `tomorrow 5pm`.
    pub due_string: Option<String>,
    /// 1 (normal) to 4 (urgent) as the API counts it.
    pub priority: Option<u8>,
    pub order: Option<i64>,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    fn to_params(&self) -> Params {
        Params::new()
            .insert("content", self.content.as_str())
            .insert("project_id", self.project_id.clone())
            .insert("due_string", self.due_string.clone())
            .insert("order", self.order)
            .insert("priority", self.priority)
    }
}

impl<C: ToolContext> Toolkit<C> {
    /// Lists active tasks, one line each.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<String> {
        let tasks = self
            .client()?
            .get("/tasks", Some(&filter.to_params()))
            .await
            .context("Failed to list tasks")?;
        Ok(format_tasks(&tasks))
    }

    /// Creates a task and returns the full task object, including its ID.
    #[tracing::instrument(skip(self))]
    pub async fn add_task(&self, task: &NewTask) -> Result<Value> {
        let body = task.to_params();
        let created = self
            .client()?
            .post_json("/tasks", Some(&body))
            .await
            .and_then(require_task_id)
            .with_context(|| {
                format!(
                    "Failed to create task with payload {}",
                    serde_json::to_string(&body).unwrap_or_default()
                )
            })?;

        info!("Created task {}", created["id"].as_str().unwrap_or_default());
        Ok(created)
    }

    /// Marks a task complete.
    #[tracing::instrument(skip(self))]
    pub async fn close_task(&self, task_id: &str) -> Result<bool> {
        let segment = task_segment(task_id)?;
        self.client()?
            .post(&format!("/tasks/{}/close", segment), None)
            .await
            .with_context(|| format!("Failed to close task {}", task_id))?;

        info!("Closed task {}", task_id);
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, task_id: &str) -> Result<bool> {
        let segment = task_segment(task_id)?;
        self.client()?
            .delete(&format!("/tasks/{}", segment))
            .await
            .with_context(|| format!("Failed to delete task {}", task_id))?;

        info!("Deleted task {}", task_id);
        Ok(true)
    }
}

fn task_segment(task_id: &str) -> Result<String> {
    path_segment(task_id).with_context(|| format!("Invalid task ID {:?}", task_id))
}

/// A created task must be an object with a non-empty `id`.
fn require_task_id(value: Value) -> Result<Value, ApiError> {
    if !value.is_object() {
        return Err(ApiError::MalformedResponse(format!(
            "Unexpected response from Todoist API: {}",
            value
        )));
    }
    let has_id = match value.get("id") {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };
    if !has_id {
        return Err(ApiError::MalformedResponse(format!(
            "Task created but no ID returned: {}",
            value
        )));
    }
    Ok(value)
}
