//! In-memory task store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A task owned by one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tasks, oldest first.
    pub async fn list_all(&self) -> Vec<Task> {
        let mut all: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        all.sort_by_key(|t| t.created_at);
        all
    }

    /// Tasks owned by `owner_id`, oldest first.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Vec<Task> {
        let mut owned: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.created_at);
        owned
    }

    pub async fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.read().await.get(&id).cloned()
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Task {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.insert(task.id, task.clone());
        task
    }

    /// Applies `changes`; `None` if the task does not exist.
    pub async fn update(&self, id: Uuid, changes: TaskChanges) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id)?;
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    pub async fn delete(&self, id: Uuid) -> Option<Task> {
        self.tasks.write().await.remove(&id)
    }
}
