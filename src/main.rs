use clap::Parser;
use fanout_dispatch::config::{Cli, ParsedConfig};
use fanout_dispatch::{build_service, http, init_logger};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(&cli.log_path);

    let config: ParsedConfig = match cli.try_into() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let service = build_service(&config);
    let app = http::router(service);

    info!(msg = "start", addr = %config.bind_addr);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(msg = "could not start", addr = %config.bind_addr, err = %err);
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(msg = "server error", err = %err);
    }
}
