//! Service façade: create, read status of, and kill tasks.

use std::sync::Arc;

use tracing::error;

use crate::error::{IdGenerationSnafu, ServiceError, TaskNotFoundSnafu};
use crate::id::IdGenerator;
use crate::model::{TaskConfig, TaskId, TaskStatus};
use crate::registry::Registry;
use crate::remote::RemoteCall;
use crate::task::Task;

use snafu::{OptionExt, ResultExt};

/// Owns the fixed worker address list and the collaborators every task is
/// constructed with. Panics at construction time on a missing
/// collaborator, a programmer error never triggered by operational input.
pub struct Service {
    client: Arc<dyn RemoteCall>,
    addrs: Vec<String>,
    id_gen: Box<dyn IdGenerator>,
    registry: Registry,
}

impl Service {
    pub fn new(client: Arc<dyn RemoteCall>, addrs: Vec<String>, id_gen: Box<dyn IdGenerator>) -> Self {
        if addrs.is_empty() {
            panic!("missing addrs");
        }
        Service {
            client,
            addrs,
            id_gen,
            registry: Registry::new(),
        }
    }

    /// Constructs and starts a task, inserts it into the registry, returns
    /// its id. Errors: id-allocation failure surfaces as
    /// `"failed to generate id"`; the underlying cause is logged, not
    /// returned, to avoid leaking internals to external callers.
    pub async fn create_task(&self, config: TaskConfig) -> Result<TaskId, ServiceError> {
        let task = Task::new(config, Arc::clone(&self.client), &self.addrs, self.id_gen.as_ref())
            .map_err(|source| {
                error!(msg = "failed to create task", err = %source);
                source
            })
            .context(IdGenerationSnafu)?;

        let id = task.id().to_string();
        self.registry.insert(task).await;
        Ok(id)
    }

    /// Returns the current snapshot of an existing task; `None` when
    /// unknown. Never blocks.
    pub async fn task_status(&self, id: &str) -> Option<TaskStatus> {
        let task = self.registry.lookup(id).await?;
        Some(task.status())
    }

    /// Returns `None` when unknown; otherwise triggers the task's kill and
    /// returns the resulting snapshot. May block for the duration of
    /// in-flight remote calls.
    pub async fn kill_task(&self, id: &str) -> Option<TaskStatus> {
        let task = self.registry.lookup(id).await?;
        task.kill().await;
        Some(task.status())
    }

    /// Typed variant of [`Self::task_status`] for callers that want a
    /// `TaskNotFound` error rather than an `Option` (used by the HTTP
    /// layer to produce a uniform error response).
    pub async fn task_status_or_err(&self, id: &str) -> Result<TaskStatus, ServiceError> {
        self.task_status(id).await.context(TaskNotFoundSnafu { id })
    }

    pub async fn kill_task_or_err(&self, id: &str) -> Result<TaskStatus, ServiceError> {
        self.kill_task(id).await.context(TaskNotFoundSnafu { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UuidGenerator;
    use crate::model::TaskMode;
    use crate::remote::mock::MockRemoteClient;

    fn service() -> Service {
        Service::new(
            Arc::new(MockRemoteClient::new()),
            vec!["addr0".to_string(), "addr1".to_string()],
            Box::new(UuidGenerator),
        )
    }

    #[tokio::test]
    async fn create_then_status_then_kill() {
        let svc = service();
        let config = TaskConfig {
            client_id: "c".into(),
            info: "i".into(),
            mode: TaskMode::Sequential,
            fail_on_error: false,
        };
        let id = svc.create_task(config).await.unwrap();

        let status = svc.task_status(&id).await.unwrap();
        assert_eq!(status.results.len(), 2);

        let killed = svc.kill_task(&id).await.unwrap();
        assert!(killed.results.iter().all(|r| r.status.is_terminal()));
    }

    #[tokio::test]
    async fn unknown_id_returns_none() {
        let svc = service();
        assert!(svc.task_status("nope").await.is_none());
        assert!(svc.kill_task("nope").await.is_none());
    }

    #[tokio::test]
    async fn unknown_id_returns_not_found_error() {
        let svc = service();
        let err = svc.task_status_or_err("nope").await.unwrap_err();
        assert_eq!(err.client_message(), "not found");
    }

    #[test]
    #[should_panic(expected = "missing addrs")]
    fn panics_on_empty_addrs() {
        Service::new(Arc::new(MockRemoteClient::new()), vec![], Box::new(UuidGenerator));
    }
}
