//! An injected collaborator that performs one cancellable HTTP call
//! against one worker address.

use async_trait::async_trait;
use bytes::Bytes;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;

use crate::error::{CancelledSnafu, ReadBodySnafu, RemoteCallError, RemoteFailureSnafu, TransportSnafu};

/// Bounded prefix of a response body read before judging success.
const RESPONSE_PREFIX_LIMIT: usize = 1024;

/// Bytes a successful response must begin with.
const OK_MARKER: &[u8] = b"OK";

/// Issue one update to one worker address, honoring cancellation.
///
/// Implementations must be safe to call concurrently from many execution
/// contexts: `&self`, no interior mutation of shared state beyond what
/// the implementation itself guards.
#[async_trait]
pub trait RemoteCall: Send + Sync {
    async fn update(
        &self,
        token: CancellationToken,
        addr: &str,
        info: &str,
    ) -> Result<(), RemoteCallError>;
}

/// Reference implementation: one HTTP POST per call, body equal to `info`,
/// success iff the response begins with the literal bytes `OK`.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
}

impl HttpRemoteClient {
    pub fn new() -> Self {
        HttpRemoteClient {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpRemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteCall for HttpRemoteClient {
    async fn update(
        &self,
        token: CancellationToken,
        addr: &str,
        info: &str,
    ) -> Result<(), RemoteCallError> {
        let url = format!("http://{addr}");
        let request = self.client.post(&url).body(info.to_string()).send();

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => {
                return Err(CancelledSnafu { addr: addr.to_string() }.build());
            }
            result = request => result.context(TransportSnafu { addr: addr.to_string() })?,
        };

        let body: Bytes = tokio::select! {
            biased;
            _ = token.cancelled() => {
                return Err(CancelledSnafu { addr: addr.to_string() }.build());
            }
            result = response.bytes() => result.context(ReadBodySnafu { addr: addr.to_string() })?,
        };

        let prefix = &body[..body.len().min(RESPONSE_PREFIX_LIMIT)];
        if prefix.starts_with(OK_MARKER) {
            Ok(())
        } else {
            RemoteFailureSnafu {
                prefix: String::from_utf8_lossy(prefix).into_owned(),
            }
            .fail()
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Scriptable remote-call capability for scheduler tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use tokio::time::Duration;

    use super::*;

    /// A single address's scripted response.
    pub enum Scripted {
        Ok,
        Err(&'static str),
        /// Blocks until the cancellation token fires, then returns the
        /// error (used to exercise the `killed` path).
        BlockUntilCancelled(&'static str),
    }

    #[derive(Default)]
    pub struct MockRemoteClient {
        scripts: Mutex<HashMap<String, Vec<ScriptEntry>>>,
    }

    enum ScriptEntry {
        Ok,
        Err(&'static str),
        BlockUntilCancelled(&'static str),
    }

    impl MockRemoteClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the next response for `addr`. Calls beyond the scripted
        /// count return `Ok`.
        pub fn script(&self, addr: impl Into<String>, response: Scripted) {
            let entry = match response {
                Scripted::Ok => ScriptEntry::Ok,
                Scripted::Err(e) => ScriptEntry::Err(e),
                Scripted::BlockUntilCancelled(e) => ScriptEntry::BlockUntilCancelled(e),
            };
            self.scripts
                .lock()
                .unwrap()
                .entry(addr.into())
                .or_default()
                .push(entry);
        }
    }

    #[async_trait]
    impl RemoteCall for MockRemoteClient {
        async fn update(
            &self,
            token: CancellationToken,
            addr: &str,
            _info: &str,
        ) -> Result<(), RemoteCallError> {
            let entry = {
                let mut scripts = self.scripts.lock().unwrap();
                scripts
                    .get_mut(addr)
                    .and_then(|v| if v.is_empty() { None } else { Some(v.remove(0)) })
            };

            match entry {
                None | Some(ScriptEntry::Ok) => Ok(()),
                Some(ScriptEntry::Err(msg)) => RemoteFailureSnafu { prefix: msg }.fail(),
                Some(ScriptEntry::BlockUntilCancelled(msg)) => {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(Duration::from_secs(30)) => {}
                    }
                    if token.is_cancelled() {
                        CancelledSnafu { addr: addr.to_string() }.fail()
                    } else {
                        RemoteFailureSnafu { prefix: msg }.fail()
                    }
                }
            }
        }
    }
}
