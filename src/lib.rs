pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod model;
pub mod registry;
pub mod remote;
pub mod result_cell;
pub mod service;
pub mod task;

use std::sync::Arc;

use config::ParsedConfig;
use id::UuidGenerator;
use remote::HttpRemoteClient;
use service::Service;

/// Initializes the global `tracing` subscriber: an `EnvFilter` read from
/// `FANOUT_LOG`, writing compact, non-ANSI lines to the configured log
/// file.
pub fn init_logger(log_path: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    if let Some(parent) = std::path::Path::new(log_path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .expect("unable to open log file");

    tracing_subscriber::registry()
        .with(EnvFilter::from_env("FANOUT_LOG"))
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .init();
}

/// Builds the service façade from parsed configuration, wiring the
/// reference `HttpRemoteClient` and `UuidGenerator` collaborators.
pub fn build_service(config: &ParsedConfig) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(HttpRemoteClient::new()),
        config.worker_addrs.clone(),
        Box::new(UuidGenerator),
    ))
}
