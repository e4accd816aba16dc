//! Owned handle for the background tasks of one authenticated session.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::task::JoinHandle;

/// Background tasks bound to a single authenticated session.
///
/// Dropping the handle aborts every task it spawned. `live` counts tasks whose
/// futures have not been dropped yet, across every handle sharing the counter.
#[derive(Debug)]
pub struct SessionTimers {
    handles: Vec<(&'static str, JoinHandle<()>)>,
    live: Arc<AtomicUsize>,
}

struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SessionTimers {
    #[must_use]
    pub const fn new(live: Arc<AtomicUsize>) -> Self {
        Self {
            handles: Vec::new(),
            live,
        }
    }

    /// Spawn `task` on the current Tokio runtime and bind it to this handle.
    pub fn spawn<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.live.fetch_add(1, Ordering::SeqCst);
        let guard = LiveGuard(Arc::clone(&self.live));
        let handle = tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });
        tracing::debug!(timer = name, "session timer started");
        self.handles.push((name, handle));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        for (name, handle) in &self.handles {
            handle.abort();
            tracing::debug!(timer = name, "session timer released");
        }
    }
}
