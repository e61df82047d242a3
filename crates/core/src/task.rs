//! Task model - the stored unit of work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{TaskId, TaskKey};
use crate::input::{TaskInput, DATE_FORMAT};
use crate::Date;

/// A validated task as kept by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Calendar due date
    pub due_date: Date,

    /// Estimated effort in hours (positive)
    pub estimated_hours: f64,

    /// Importance rating (1-10)
    pub importance: u8,

    /// Tasks referenced by this one
    pub dependencies: Vec<TaskId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from a draft, rejecting it if [`TaskDraft::validate`] fails.
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id,
            title: draft.title,
            due_date: draft.due_date,
            estimated_hours: draft.estimated_hours,
            importance: draft.importance as u8,
            dependencies: draft.dependencies,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace every editable field with the draft's values.
    pub fn apply(&mut self, draft: TaskDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.title = draft.title;
        self.due_date = draft.due_date;
        self.estimated_hours = draft.estimated_hours;
        self.importance = draft.importance as u8;
        self.dependencies = draft.dependencies;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Loose view of this task, suitable for scoring.
    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            id: Some(self.id.into()),
            title: self.title.clone(),
            due_date: Some(self.due_date.format(DATE_FORMAT).to_string().into()),
            estimated_hours: Some(self.estimated_hours.into()),
            importance: Some(u64::from(self.importance).into()),
            dependencies: self.dependencies.iter().copied().map(TaskKey::from).collect(),
            ..Default::default()
        }
    }
}

/// Field values for creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title
    pub title: String,

    /// Calendar due date
    pub due_date: Date,

    /// Estimated effort in hours
    pub estimated_hours: f64,

    /// Importance rating
    pub importance: i64,

    /// Tasks referenced by this one
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl TaskDraft {
    /// Check the draft against the write rules of the task store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if !(1..=10).contains(&self.importance) {
            return Err(ValidationError::ImportanceOutOfRange(self.importance));
        }
        if !self.estimated_hours.is_finite() || self.estimated_hours <= 0.0 {
            return Err(ValidationError::NonPositiveHours(self.estimated_hours));
        }
        Ok(())
    }
}

/// Rejection of a task write.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Title is blank
    #[error("Title must not be empty")]
    EmptyTitle,

    /// Importance outside 1..=10
    #[error("Importance must be between 1 and 10 (got {0})")]
    ImportanceOutOfRange(i64),

    /// Hours zero, negative or not finite
    #[error("Estimated hours must be positive (got {0})")]
    NonPositiveHours(f64),
}
