//! Settings change notifications.
//!
//! Admin saves publish the new settings; views subscribe instead of polling.

use tokio::sync::broadcast;

use crate::models::SiteSettings;

/// Publish/subscribe hub for site settings changes.
#[derive(Clone)]
pub struct SettingsNotifier {
    tx: broadcast::Sender<SiteSettings>,
}

impl SettingsNotifier {
    /// Create a notifier buffering up to `capacity` unread changes per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a change. Returns how many subscribers received it.
    pub fn publish(&self, settings: SiteSettings) -> usize {
        match self.tx.send(settings) {
            Ok(count) => {
                tracing::debug!("Settings change delivered to {} subscribers", count);
                count
            }
            // No subscribers connected
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SiteSettings> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initial_settings;

    #[tokio::test]
    async fn test_subscriber_receives_published_settings() {
        let notifier = SettingsNotifier::new(8);
        let mut rx = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        let mut settings = initial_settings();
        settings.marquee_text = "Exams start Monday".to_string();
        assert_eq!(notifier.publish(settings.clone()), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, settings);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let notifier = SettingsNotifier::new(8);
        assert_eq!(notifier.publish(initial_settings()), 0);
    }
}
