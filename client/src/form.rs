//! Text input from the add and edit forms, checked before it reaches the
//! store.

use chrono::NaiveDate;
use tasko_shared::{Priority, Task, TaskDraft, TaskStatus};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

impl TaskInput {
    /// A blank add form with the default selections.
    pub fn blank() -> Self {
        Self {
            status: TaskStatus::default().to_string(),
            priority: Priority::default().to_string(),
            ..Default::default()
        }
    }

    /// The edit form, prefilled from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.to_string(),
            priority: task.priority.to_string(),
            due_date: task.due_date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn parse(&self) -> Result<TaskDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ClientError::Validation("Title is required".to_string()));
        }

        let due_date = self.due_date.trim();
        if due_date.is_empty() {
            return Err(ClientError::Validation("Due date is required".to_string()));
        }
        let due_date = NaiveDate::parse_from_str(due_date, "%Y-%m-%d").map_err(|_| {
            ClientError::Validation(format!("Due date {due_date:?} must look like 2025-01-31"))
        })?;

        Ok(TaskDraft {
            title: title.to_string(),
            description: self.description.trim_end().to_string(),
            status: self.status.parse()?,
            priority: self.priority.parse()?,
            due_date,
        })
    }
}

pub(crate) fn validate(draft: &TaskDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(ClientError::Validation("Title is required".to_string()));
    }
    Ok(())
}
