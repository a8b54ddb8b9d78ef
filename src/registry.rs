//! Thread-safe map from task id to task, owning task lifetimes.
//! Insertion-only within a process instance; tasks are never removed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::TaskId;
use crate::task::Task;

/// Readers may run concurrently with each other; writers are exclusive.
/// Lookup never touches a task's internal lock, it only reads the map,
/// then hands back a cloned `Arc`.
#[derive(Default)]
pub struct Registry {
    tasks: RwLock<HashMap<TaskId, Arc<Task>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, task: Arc<Task>) {
        self.tasks.write().await.insert(task.id().to_string(), task);
    }

    pub async fn lookup(&self, id: &str) -> Option<Arc<Task>> {
        self.tasks.read().await.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UuidGenerator;
    use crate::model::{TaskConfig, TaskMode};
    use crate::remote::mock::MockRemoteClient;

    #[tokio::test]
    async fn insert_then_lookup_roundtrips() {
        let registry = Registry::new();
        let client = Arc::new(MockRemoteClient::new());
        let config = TaskConfig {
            client_id: "c".into(),
            info: "i".into(),
            mode: TaskMode::Sequential,
            fail_on_error: false,
        };
        let task = Task::new(config, client, &["addr0".to_string()], &UuidGenerator).unwrap();
        let id = task.id().to_string();
        registry.insert(task).await;

        assert!(registry.lookup(&id).await.is_some());
        assert!(registry.lookup("unknown").await.is_none());
    }
}
