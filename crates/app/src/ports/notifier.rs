//! Notifier port — outbound notification dispatch.

use std::future::Future;

use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::notify::NotifyService;

/// Sends a notification through a host notification service.
pub trait Notifier {
    /// Dispatch `message` via `service`, with service-specific `data`
    /// (push settings).
    fn notify(
        &self,
        service: &NotifyService,
        message: &str,
        data: &serde_json::Value,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for std::sync::Arc<T> {
    fn notify(
        &self,
        service: &NotifyService,
        message: &str,
        data: &serde_json::Value,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        (**self).notify(service, message, data)
    }
}
