//! Wire and domain types shared between the task engine and the HTTP surface.

use serde::{Deserialize, Serialize};

/// Unique identifier for a task, valid for the lifetime of the process.
pub type TaskId = String;

/// Execution mode for a task's worker fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    Sequential,
    Parallel,
}

/// Parameters supplied by a client when creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub client_id: String,
    pub info: String,
    pub mode: TaskMode,
    #[serde(rename = "failonerror")]
    pub fail_on_error: bool,
}

/// Terminal and non-terminal execution status of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Running,
    Success,
    Failure,
    Killed,
    Ignored,
}

impl Status {
    /// Terminal statuses are the ones a worker never leaves once reached.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Success | Status::Failure | Status::Killed | Status::Ignored
        )
    }
}

/// A by-value snapshot of one worker's outcome, safe to serialize or hand to
/// a caller without exposing the guard that protects the live cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub addr: String,
    pub status: Status,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub message: String,
}

/// Overall task status: an ordered snapshot of every worker's result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub results: Vec<WorkerResult>,
}
