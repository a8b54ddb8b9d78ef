//! Process configuration: a thin `clap`-derived CLI surface, flag-only
//! (no config file).

use clap::Parser;
use snafu::{ensure, ResultExt};

use crate::error::{ConfigError, InvalidBindAddressSnafu, NoWorkerAddressesSnafu};

#[derive(Parser, Debug)]
#[command(name = "fanout-dispatch")]
#[command(about = "Fans an update command out to a fixed list of worker addresses")]
pub struct Cli {
    /// HTTP bind address, e.g. "0.0.0.0:8080".
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub http: String,

    /// Path the structured log is written to.
    #[arg(long, default_value = "fanout-dispatch.log")]
    pub log_path: String,

    /// Worker addresses the dispatcher fans tasks out to (host:port each).
    #[arg(required = true)]
    pub addrs: Vec<String>,
}

/// Parsed, validated configuration ready to build the service and server.
pub struct ParsedConfig {
    pub bind_addr: std::net::SocketAddr,
    pub log_path: String,
    pub worker_addrs: Vec<String>,
}

impl TryFrom<Cli> for ParsedConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        ensure!(!cli.addrs.is_empty(), NoWorkerAddressesSnafu);

        let bind_addr = cli
            .http
            .parse()
            .context(InvalidBindAddressSnafu { addr: cli.http.clone() })?;

        Ok(ParsedConfig {
            bind_addr,
            log_path: cli.log_path,
            worker_addrs: cli.addrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_addrs() {
        let cli = Cli {
            http: "0.0.0.0:8080".into(),
            log_path: "x.log".into(),
            addrs: vec![],
        };
        assert!(ParsedConfig::try_from(cli).is_err());
    }

    #[test]
    fn rejects_invalid_bind_address() {
        let cli = Cli {
            http: "not-an-address".into(),
            log_path: "x.log".into(),
            addrs: vec!["addr0".into()],
        };
        assert!(ParsedConfig::try_from(cli).is_err());
    }

    #[test]
    fn accepts_valid_config() {
        let cli = Cli {
            http: "127.0.0.1:9000".into(),
            log_path: "x.log".into(),
            addrs: vec!["addr0".into(), "addr1".into()],
        };
        let parsed = ParsedConfig::try_from(cli).unwrap();
        assert_eq!(parsed.worker_addrs.len(), 2);
    }
}
