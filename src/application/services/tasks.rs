//! Microsoft To Do service

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, instrument};

use super::{decode, decode_created, id_segment, to_body};
use crate::application::{ApplicationResult, GraphResultExt};
use crate::domain::{odata_string, Collection, NewTask, Query, TodoList, TodoTask};
use crate::infrastructure::traits::GraphClient;

pub struct TasksService {
    graph: Arc<dyn GraphClient>,
}

impl TasksService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    #[instrument(skip(self))]
    pub fn lists(&self) -> ApplicationResult<Collection<TodoList>> {
        let value = self
            .graph
            .get_json("/me/todo/lists", &Query::new())
            .context("list task lists")?;
        decode(value, "task lists")
    }

    /// Tasks of a list; completed tasks only when `include_completed`.
    #[instrument(skip(self))]
    pub fn list(
        &self,
        list_id: &str,
        include_completed: bool,
    ) -> ApplicationResult<Collection<TodoTask>> {
        let path = format!("/me/todo/lists/{}/tasks", id_segment(list_id)?);
        let mut query = Query::new();
        if !include_completed {
            query = query.filter(format!("status ne {}", odata_string("completed")));
        }
        let value = self.graph.get_json(&path, &query).context("list tasks")?;
        let tasks: Collection<TodoTask> = decode(value, "tasks")?;
        debug!("list: {} tasks", tasks.value.len());
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(title = %task.title))]
    pub fn add(&self, list_id: &str, task: &NewTask) -> ApplicationResult<TodoTask> {
        let path = format!("/me/todo/lists/{}/tasks", id_segment(list_id)?);
        let body = to_body(task, "task")?;
        let created = self.graph.post_json(&path, &body).context("add task")?;
        decode_created(created, "task")
    }

    #[instrument(skip(self))]
    pub fn complete(&self, list_id: &str, task_id: &str) -> ApplicationResult<TodoTask> {
        let path = task_path(list_id, task_id)?;
        let value = self
            .graph
            .patch_json(&path, &json!({"status": "completed"}))
            .context("complete task")?;
        decode(value, "task")
    }

    #[instrument(skip(self))]
    pub fn delete(&self, list_id: &str, task_id: &str) -> ApplicationResult<()> {
        let path = task_path(list_id, task_id)?;
        self.graph.delete(&path).context("delete task")
    }
}

fn task_path(list_id: &str, task_id: &str) -> ApplicationResult<String> {
    Ok(format!(
        "/me/todo/lists/{}/tasks/{}",
        id_segment(list_id)?,
        id_segment(task_id)?
    ))
}
