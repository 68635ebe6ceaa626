//! Tokio Runtime Bridge
//!
//! GPUI uses a smol-like executor, but reqwest requires tokio.
//! This module provides a bridge to run tokio futures from any context.
//!
//! ## Pattern
//!
//! ```text
//! GPUI async task / tokio task
//!       │
//!       ▼
//! spawn_eager(async { ... })
//!       │
//!       ▼
//! ambient tokio runtime, else process-wide runtime
//!       │
//!       ▼
//! JoinHandle awaited from any executor
//! ```

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("xcmd-io")
            .enable_all()
            .build()
            .unwrap_or_else(|e| panic!("Failed to create tokio runtime: {e}"))
    })
}

/// Handle of the ambient runtime when called from inside tokio, else the global one
pub fn runtime_handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| get_runtime().handle().clone())
}

/// Start a future immediately and return its handle
///
/// The future begins running before the handle is awaited, so callers can
/// issue a request at construction time and collect the result later.
pub fn spawn_eager<F, T>(future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    runtime_handle().spawn(future)
}

/// Execute a future in the tokio runtime and wait for the result
pub async fn run_in_tokio<F, T>(future: F) -> T
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match spawn_eager(future).await {
        Ok(result) => result,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_eager_without_ambient_runtime() {
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_eager(async move {
            let _ = tx.send(42);
        });
        let value = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("task should run on the global runtime");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_run_in_tokio_uses_ambient_runtime() {
        let value = run_in_tokio(async { 7 }).await;
        assert_eq!(value, 7);
    }
}
