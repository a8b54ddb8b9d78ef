//! A per-worker, atomically-updatable status and message, guarded so the
//! scheduler can touch different cells concurrently in parallel mode while
//! the status endpoint takes a snapshot.

use std::sync::RwLock;

use crate::model::{Status, WorkerResult};

/// One worker's mutable outcome, guarded by its own lock so parallel
/// workers don't contend on a single shared lock.
#[derive(Debug)]
pub struct ResultCell {
    addr: String,
    inner: RwLock<Inner>,
}

#[derive(Debug, Clone)]
struct Inner {
    status: Status,
    message: String,
}

impl ResultCell {
    pub fn new(addr: String) -> Self {
        ResultCell {
            addr,
            inner: RwLock::new(Inner {
                status: Status::Pending,
                message: String::new(),
            }),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Atomically replaces the status and, if an error is supplied, the
    /// message. Holds the write lock for the whole update so a concurrent
    /// `snapshot` never observes a torn write.
    pub fn set_status(&self, status: Status, err: Option<&(dyn std::fmt::Display + Send + Sync)>) {
        let mut inner = self.inner.write().expect("result cell lock poisoned");
        inner.status = status;
        if let Some(err) = err {
            inner.message = err.to_string();
        }
    }

    /// By-value copy of the current status and message; never blocks for
    /// long since writers only hold the lock for the duration of a single
    /// field assignment.
    pub fn snapshot(&self) -> WorkerResult {
        let inner = self.inner.read().expect("result cell lock poisoned");
        WorkerResult {
            addr: self.addr.clone(),
            status: inner.status,
            message: inner.message.clone(),
        }
    }

    pub fn status(&self) -> Status {
        self.inner.read().expect("result cell lock poisoned").status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn initial_status_is_pending() {
        let cell = ResultCell::new("addr0".into());
        let snap = cell.snapshot();
        assert_eq!(snap.addr, "addr0");
        assert_eq!(snap.status, Status::Pending);
        assert_eq!(snap.message, "");
    }

    #[test]
    fn set_status_without_error_preserves_empty_message() {
        let cell = ResultCell::new("addr0".into());
        cell.set_status(Status::Running, None);
        assert_eq!(cell.snapshot().message, "");
        assert_eq!(cell.status(), Status::Running);
    }

    #[test]
    fn set_status_with_error_records_message() {
        let cell = ResultCell::new("addr0".into());
        cell.set_status(Status::Failure, Some(&"boom"));
        let snap = cell.snapshot();
        assert_eq!(snap.status, Status::Failure);
        assert_eq!(snap.message, "boom");
    }

    #[test]
    fn concurrent_updates_never_tear() {
        let cell = Arc::new(ResultCell::new("addr0".into()));
        let mut handles = vec![];
        for i in 0..50 {
            let cell = Arc::clone(&cell);
            handles.push(thread::spawn(move || {
                cell.set_status(Status::Running, Some(&format!("iter{i}")));
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let snap = cell.snapshot();
        assert!(snap.message.starts_with("iter"));
    }
}
