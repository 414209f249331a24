use std::future::Future;

use storage::repository::StorageError;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Fire-and-forget runner for persistence calls.
///
/// Every call is spawned immediately and never awaited by the caller. A
/// failure is logged with its operation label and then dropped; nothing is
/// retried. Calls still running when the dispatcher is dropped are detached,
/// not cancelled.
#[derive(Debug)]
pub struct Dispatcher {
    handle: Option<Handle>,
    tasks: JoinSet<()>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Bind to the ambient tokio runtime, if there is one.
    ///
    /// Without a runtime every dispatched call is dropped with a warning, so
    /// sessions still run offline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: Handle::try_current().ok(),
            tasks: JoinSet::new(),
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn `call`, labelled `operation` in logs.
    pub fn dispatch<F>(&mut self, operation: &'static str, call: F)
    where
        F: Future<Output = Result<(), StorageError>> + Send + 'static,
    {
        self.reap();
        let Some(handle) = &self.handle else {
            warn!(operation, "no async runtime; persistence call dropped");
            return;
        };
        self.tasks.spawn_on(
            async move {
                match call.await {
                    Ok(()) => debug!(operation, "persistence call completed"),
                    Err(err) => warn!(operation, error = %err, "persistence call failed"),
                }
            },
            handle,
        );
    }

    /// Calls spawned and not yet observed as finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every dispatched call to finish.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "persistence task did not complete");
            }
        }
    }

    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(err) = joined {
                warn!(error = %err, "persistence task did not complete");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.tasks.detach_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn failures_are_contained() {
        let mut dispatcher = Dispatcher::new();
        let done = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&done);
        dispatcher.dispatch("ok", async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        dispatcher.dispatch("broken", async { Err(StorageError::Connection("down".into())) });

        dispatcher.settle().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[test]
    fn without_runtime_calls_are_dropped() {
        let mut dispatcher = Dispatcher::new();
        assert!(!dispatcher.is_attached());
        dispatcher.dispatch("orphan", async { Ok(()) });
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn dropping_detaches_running_calls() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        {
            let mut dispatcher = Dispatcher::new();
            dispatcher.dispatch("late", async move {
                tokio::task::yield_now().await;
                let _ = tx.send(());
                Ok(())
            });
        }
        assert!(rx.await.is_ok());
    }
}
