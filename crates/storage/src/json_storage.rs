//! JSON file storage implementation.
//!
//! Stores each task as a JSON file under `tasks/`. Ids come from a counter in
//! `meta/sequence.json` and are never reused, even after `clear`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use taskrank_core::{Task, TaskDraft, TaskId};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{Result, Storage, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directories it needs.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("tasks")).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn task_path(&self, id: TaskId) -> PathBuf {
        self.root.join("tasks").join(format!("{}.json", id))
    }

    fn sequence_path(&self) -> PathBuf {
        self.root.join("meta").join("sequence.json")
    }

    /// Reserve the next task id.
    async fn next_id(&self) -> Result<TaskId> {
        let path = self.sequence_path();
        let last = match read_json::<serde_json::Value>(&path).await? {
            Some(json) => json.get("last_id").and_then(|v| v.as_u64()).unwrap_or(0),
            None => 0,
        };

        let id = TaskId::new(last).next();
        let seq = serde_json::json!({ "last_id": id.get() });
        fs::write(&path, serde_json::to_string_pretty(&seq)?.as_bytes()).await?;
        Ok(id)
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let id = self.next_id().await?;
        let task = Task::from_draft(id, draft)?;
        self.save_task(&task).await?;
        info!(task = %task.id, title = %task.title, "Created task");
        Ok(task)
    }

    async fn save_task(&mut self, task: &Task) -> Result<()> {
        let path = self.task_path(task.id);
        let json = serde_json::to_string_pretty(task)?;
        fs::write(&path, json.as_bytes()).await?;
        debug!(task = %task.id, "Saved task");
        Ok(())
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        read_json(&self.task_path(id)).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = list_dir(&self.root.join("tasks")).await?;
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        fs::remove_file(self.task_path(id)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(id)
            } else {
                e.into()
            }
        })?;
        info!(task = %id, "Deleted task");
        Ok(())
    }

    async fn clear_tasks(&mut self) -> Result<usize> {
        // Every task file goes, including ones that no longer parse.
        let mut count = 0;
        for path in json_files(&self.root.join("tasks")).await? {
            remove_if_exists(&path).await?;
            count += 1;
        }
        info!(count, "Cleared tasks");
        Ok(count)
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    Ok(paths)
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for path in json_files(dir).await? {
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable task file"),
        }
    }
    Ok(items)
}
