//! Storage trait abstraction.

use async_trait::async_trait;
use taskrank_core::{Task, TaskDraft, TaskId, ValidationError};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected write
    #[error("Invalid task: {0}")]
    Validation(#[from] ValidationError),

    /// Item not found
    #[error("Task not found: {0}")]
    NotFound(TaskId),
}

/// Storage abstraction for tasks.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Validate a draft, assign it the next id and store it.
    async fn create_task(&mut self, draft: TaskDraft) -> Result<Task>;

    /// Save a task (create or update).
    async fn save_task(&mut self, task: &Task) -> Result<()>;

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// List all tasks, ordered by id.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Delete a task.
    async fn delete_task(&mut self, id: TaskId) -> Result<()>;

    /// Delete every task, returning how many were removed.
    async fn clear_tasks(&mut self) -> Result<usize>;

    /// Replace the editable fields of an existing task.
    async fn update_task(&mut self, id: TaskId, draft: TaskDraft) -> Result<Task> {
        let mut task = self.load_task(id).await?.ok_or(StorageError::NotFound(id))?;
        task.apply(draft)?;
        self.save_task(&task).await?;
        Ok(task)
    }
}
