//! Standalone worker stub: binds one trivial HTTP listener per address
//! given on the command line and answers every request with `OK`. A
//! manual-testing companion to the dispatcher binary, not part of the
//! core service.

use axum::routing::any;
use axum::Router;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "waiter")]
#[command(about = "Starts dummy worker listeners that answer every request with OK")]
struct Cli {
    /// Addresses to listen on, e.g. "127.0.0.1:9001" "127.0.0.1:9002".
    #[arg(required = true)]
    addrs: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut handles = Vec::with_capacity(cli.addrs.len());
    for addr in cli.addrs {
        handles.push(tokio::spawn(async move {
            let app = Router::new().route("/", any(|| async { "OK" }));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .unwrap_or_else(|err| panic!("failed to bind {addr}: {err}"));
            println!("waiter listening on {addr}");
            axum::serve(listener, app).await.unwrap();
        }));
    }

    for handle in handles {
        let _ = handle.await;
    }
}
