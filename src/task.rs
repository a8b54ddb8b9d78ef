//! Task: owns a worker fan-out, runs the scheduler, and honors cancellation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::error::IdGenerationError;
use crate::id::IdGenerator;
use crate::model::{Status, TaskConfig, TaskId, TaskMode, TaskStatus};
use crate::remote::RemoteCall;
use crate::result_cell::ResultCell;

/// A single client-submitted unit that fans a payload out to every
/// configured worker address.
pub struct Task {
    id: TaskId,
    results: Vec<ResultCell>,
    /// Fires once to mark the task as no-longer-accepting-success and to
    /// propagate a cancellation token into in-flight remote calls.
    cancel: CancellationToken,
    /// Fires once, after `cancel`, when every worker has reached a
    /// terminal status.
    done: CancellationToken,
}

impl Task {
    /// Allocates an id, seeds one `pending` result per address in order,
    /// and spawns the autonomous scheduler dictated by `config.mode`. Fails
    /// only if id allocation fails.
    pub fn new(
        config: TaskConfig,
        client: Arc<dyn RemoteCall>,
        addrs: &[String],
        id_gen: &dyn IdGenerator,
    ) -> Result<Arc<Self>, IdGenerationError> {
        let id = id_gen.generate()?;

        let results = addrs
            .iter()
            .map(|addr| ResultCell::new(addr.clone()))
            .collect();

        let task = Arc::new(Task {
            id,
            results,
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
        });

        let addrs: Vec<String> = addrs.to_vec();
        let spawned = Arc::clone(&task);
        match config.mode {
            TaskMode::Sequential => {
                tokio::spawn(async move { spawned.run_sequential(config, addrs, client).await });
            }
            TaskMode::Parallel => {
                tokio::spawn(async move { spawned.run_parallel(config, addrs, client).await });
            }
        }

        Ok(task)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Iterates addresses in order, stopping early (and marking every
    /// remaining `pending` result `ignored`) on cancellation or on the
    /// first failure when `fail_on_error` is set.
    async fn run_sequential(
        self: Arc<Self>,
        config: TaskConfig,
        addrs: Vec<String>,
        client: Arc<dyn RemoteCall>,
    ) {
        for (i, addr) in addrs.iter().enumerate() {
            let err = self.remote_call(&config, i, addr, &client).await;
            if self.cancel.is_cancelled() || (err.is_some() && config.fail_on_error) {
                self.mark_pending_ignored();
                break;
            }
        }
        self.finish();
    }

    /// One concurrent execution per address, all running to completion
    /// before the task is marked done.
    async fn run_parallel(
        self: Arc<Self>,
        config: TaskConfig,
        addrs: Vec<String>,
        client: Arc<dyn RemoteCall>,
    ) {
        let config = Arc::new(config);
        let mut handles = Vec::with_capacity(addrs.len());
        for (i, addr) in addrs.into_iter().enumerate() {
            let task = Arc::clone(&self);
            let config = Arc::clone(&config);
            let client = Arc::clone(&client);
            handles.push(tokio::spawn(async move {
                task.remote_call(&config, i, &addr, &client).await;
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }
        self.finish();
    }

    /// Marks every still-`pending` result `ignored`. Never touches a
    /// result that has already reached a terminal or running status.
    fn mark_pending_ignored(&self) {
        for cell in &self.results {
            if cell.status() == Status::Pending {
                cell.set_status(Status::Ignored, None);
            }
        }
    }

    /// Runs one worker's remote call and records its terminal outcome.
    /// Returns `Some(())` on error so callers can test for failure without
    /// needing the error value itself (parallel mode discards it).
    #[instrument(skip(self, config, client), fields(task = %self.id, addr = %addr))]
    async fn remote_call(
        &self,
        config: &TaskConfig,
        index: usize,
        addr: &str,
        client: &Arc<dyn RemoteCall>,
    ) -> Option<()> {
        let cell = &self.results[index];
        cell.set_status(Status::Running, None);

        let result = client.update(self.cancel.clone(), addr, &config.info).await;

        match result {
            Ok(()) => {
                cell.set_status(Status::Success, None);
                info!(msg = "remote call success", task = %self.id, addr = %addr);
                None
            }
            Err(err) => {
                // Split by token state at the moment the error was observed.
                if self.cancel.is_cancelled() {
                    cell.set_status(Status::Killed, None);
                } else {
                    cell.set_status(Status::Failure, Some(&err));
                }

                if config.fail_on_error {
                    self.cancel.cancel();
                }

                warn!(
                    msg = "remote call failure",
                    task = %self.id,
                    addr = %addr,
                    err = %err,
                );

                Some(())
            }
        }
    }

    /// Raises `cancel` (idempotent) and `done`, in that order, on scheduler
    /// exit, whether normal or early.
    fn finish(&self) {
        self.cancel.cancel();
        self.done.cancel();
    }

    /// Returns a by-value, order-preserving snapshot of every worker's
    /// result. Never blocks.
    pub fn status(&self) -> TaskStatus {
        TaskStatus {
            results: self.results.iter().map(ResultCell::snapshot).collect(),
        }
    }

    /// Raises `cancel` and blocks until `done` fires, so that from the
    /// caller's viewpoint a subsequent status snapshot reflects the
    /// terminal outcome of every worker. Safe to call repeatedly and
    /// concurrently.
    pub async fn kill(&self) {
        self.cancel.cancel();
        self.done.cancelled().await;
    }
}
