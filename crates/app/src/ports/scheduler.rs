//! Scheduler port — one-shot delayed callbacks.

use std::future::Future;
use std::time::Duration;

use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::id::TimerHandle;
use notifreeze_domain::reminder::Reminder;

/// Schedules reminders and hands them back to the monitor when they fire.
///
/// When a timer fires, the host calls
/// [`FreezeMonitor::on_timer_fire`](crate::monitor::FreezeMonitor::on_timer_fire)
/// with the handle and the reminder passed here.
pub trait Scheduler {
    /// Fire `reminder` once after `delay`.
    fn schedule_after(
        &self,
        delay: Duration,
        reminder: Reminder,
    ) -> impl Future<Output = Result<TimerHandle, NotiFreezeError>> + Send;

    /// Cancel a pending timer. Cancelling a fired or unknown handle is a no-op.
    fn cancel(
        &self,
        handle: TimerHandle,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send;
}

impl<T: Scheduler + Send + Sync> Scheduler for std::sync::Arc<T> {
    fn schedule_after(
        &self,
        delay: Duration,
        reminder: Reminder,
    ) -> impl Future<Output = Result<TimerHandle, NotiFreezeError>> + Send {
        (**self).schedule_after(delay, reminder)
    }

    fn cancel(
        &self,
        handle: TimerHandle,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        (**self).cancel(handle)
    }
}
