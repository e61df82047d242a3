//! TaskRank core data models.
//!
//! This crate defines the task records shared by the scorer, the storage
//! backend and the command line front end.

#![warn(missing_docs)]

// Identities
mod id;

// Stored tasks and loosely typed input
mod task;
mod input;

// Re-exports
pub use id::{TaskId, TaskKey};

pub use task::{Task, TaskDraft, ValidationError};
pub use input::{TaskInput, NormalizedTask, InvalidTaskData, DATE_FORMAT};

/// Calendar date type used for due dates.
pub type Date = chrono::NaiveDate;
