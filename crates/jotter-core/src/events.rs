//! Single notification channel shared by the session manager and list views.

use tokio::sync::broadcast;

const NOTICE_CAPACITY: usize = 32;

/// Something the presentation layer should show or act upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The backend rejected the session; redirect to the login screen.
    LoginRequired,
    /// A request failed; show `message` in a toast or status line.
    Failure { context: String, message: String },
}

/// Broadcasts [`Notice`] values to any number of subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        if self.sender.send(notice).is_err() {
            tracing::debug!("Dropped notice: no subscribers");
        }
    }

    pub fn failure(&self, context: impl Into<String>, message: impl Into<String>) {
        self.publish(Notice::Failure {
            context: context.into(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_harmless() {
        Notifier::new().publish(Notice::LoginRequired);
    }

    #[test]
    fn subscribers_receive_notices_in_order() {
        let notifier = Notifier::new();
        let mut receiver = notifier.subscribe();
        notifier.publish(Notice::LoginRequired);
        notifier.failure("notes", "boom");

        assert_eq!(receiver.try_recv().unwrap(), Notice::LoginRequired);
        assert_eq!(
            receiver.try_recv().unwrap(),
            Notice::Failure {
                context: "notes".to_string(),
                message: "boom".to_string(),
            }
        );
        assert!(receiver.try_recv().is_err());
    }
}
