//! Logging implementation of the `Notifier` port.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use notifreeze_app::ports::Notifier;
use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::notify::NotifyService;

/// A notification as it was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub service: String,
    pub message: String,
    pub data: serde_json::Value,
}

/// Writes notifications to the log and keeps them for inspection.
#[derive(Clone, Default)]
pub struct LogNotifier {
    sent: Arc<Mutex<Vec<SentNotification>>>,
}

impl LogNotifier {
    /// Everything dispatched so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for LogNotifier {
    fn notify(
        &self,
        service: &NotifyService,
        message: &str,
        data: &serde_json::Value,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        tracing::info!(%service, %data, "❄️ {message}");
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentNotification {
                service: service.to_string(),
                message: message.to_string(),
                data: data.clone(),
            });
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_record_sent_notifications() {
        let notifier = LogNotifier::default();
        let service = NotifyService::parse("notify.family").unwrap();

        notifier
            .notify(&service, "Kitchen Window open", &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(
            notifier.sent(),
            vec![SentNotification {
                service: "notify.family".to_string(),
                message: "Kitchen Window open".to_string(),
                data: serde_json::json!({}),
            }]
        );
    }

    #[tokio::test]
    async fn should_share_records_between_clones() {
        let notifier = LogNotifier::default();
        let clone = notifier.clone();
        let service = NotifyService::parse("notify.family").unwrap();

        clone
            .notify(&service, "hello", &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(notifier.sent().len(), 1);
    }
}
