//! Error taxonomy for the dispatcher core.
//!
//! One `snafu`-derived enum per concern, full detail kept on the source
//! chain for logging, and short opaque strings handed back to HTTP
//! clients.

use snafu::Snafu;

use crate::model::TaskId;

/// Errors from the remote-call capability. Never escapes past a worker's
/// result cell: recorded in-band, logged, never propagated to the service
/// caller.
#[derive(Debug, Snafu)]
pub enum RemoteCallError {
    #[snafu(display("failed to send request to {addr}: {source}"))]
    Transport {
        addr: String,
        source: reqwest::Error,
    },

    #[snafu(display("failed to read response from {addr}: {source}"))]
    ReadBody {
        addr: String,
        source: reqwest::Error,
    },

    #[snafu(display("remote failure: {prefix}"))]
    RemoteFailure { prefix: String },

    #[snafu(display("call to {addr} cancelled"))]
    Cancelled { addr: String },
}

/// Errors surfaced by the service façade.
#[derive(Debug, Snafu)]
pub enum ServiceError {
    #[snafu(display("failed to generate id: {source}"))]
    IdGeneration { source: IdGenerationError },

    #[snafu(display("failed to create task"))]
    TaskConstruction,

    #[snafu(display("no task with id {id}"))]
    TaskNotFound { id: TaskId },
}

impl ServiceError {
    /// The short, opaque message a client is allowed to see; internal
    /// causes are logged, never leaked onto the wire.
    pub fn client_message(&self) -> &'static str {
        match self {
            ServiceError::IdGeneration { .. } => "failed to generate id",
            ServiceError::TaskConstruction => "failed to create task",
            ServiceError::TaskNotFound { .. } => "not found",
        }
    }
}

/// Failure of the pluggable id generator. The shipped generator (`uuid`
/// v4) cannot actually fail; this type exists because the component's
/// contract is fallible.
#[derive(Debug, Snafu)]
pub enum IdGenerationError {
    #[snafu(display("no randomness source available"))]
    NoEntropy,
}

/// Configuration errors for the CLI entry point.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("no worker addresses supplied; pass at least one"))]
    NoWorkerAddresses,

    #[snafu(display("invalid bind address '{addr}': {source}"))]
    InvalidBindAddress {
        addr: String,
        source: std::net::AddrParseError,
    },
}
