//! `tokio`-backed implementation of the `Scheduler` port.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use notifreeze_app::ports::Scheduler;
use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::id::TimerHandle;
use notifreeze_domain::reminder::Reminder;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A timer that went off, ready to be handed to the monitor.
#[derive(Debug, Clone)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub reminder: Reminder,
}

/// Runs each timer as a spawned task that sleeps, then pushes a
/// [`FiredTimer`] to the channel given to [`new`](Self::new).
///
/// Must be used from within a `tokio` runtime.
#[derive(Clone)]
pub struct TokioScheduler {
    fired: mpsc::UnboundedSender<FiredTimer>,
    tasks: Arc<Mutex<HashMap<TimerHandle, AbortHandle>>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(fired: mpsc::UnboundedSender<FiredTimer>) -> Self {
        Self {
            fired,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<TimerHandle, AbortHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of timers that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks().len()
    }

    /// Abort every pending timer.
    pub fn cancel_all(&self) {
        for (_, task) in self.tasks().drain() {
            task.abort();
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(
        &self,
        delay: Duration,
        reminder: Reminder,
    ) -> impl Future<Output = Result<TimerHandle, NotiFreezeError>> + Send {
        let handle = TimerHandle::new();
        let fired = self.fired.clone();
        let tasks = Arc::clone(&self.tasks);

        // Hold the lock across spawn so the task can not finish and remove
        // itself before it is registered.
        let mut registry = self.tasks();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&handle);
            let _ = fired.send(FiredTimer { handle, reminder });
        });
        registry.insert(handle, task.abort_handle());
        drop(registry);

        tracing::debug!(%handle, delay_secs = delay.as_secs(), "timer scheduled");
        async move { Ok(handle) }
    }

    fn cancel(
        &self,
        handle: TimerHandle,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        if let Some(task) = self.tasks().remove(&handle) {
            task.abort();
            tracing::debug!(%handle, "timer cancelled");
        }
        async { Ok(()) }
    }
}
