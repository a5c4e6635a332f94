//! Chat insert notifications
//!
//! A narrow observer interface replacing the managed store's realtime
//! channel: callers register a callback for "new message for subject X" and
//! unsubscribe explicitly when done.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;
use uuid::Uuid;

use crate::models::chat::ChatMessage;

/// Callback invoked with each newly stored chat exchange
pub type ChatCallback = Box<dyn Fn(&ChatMessage) + Send + Sync>;

/// Handle returned by `subscribe`, required for `unsubscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

struct Subscriber {
    subject_id: String,
    callback: ChatCallback,
}

/// Registry of chat-insert observers keyed by subject id
#[derive(Clone, Default)]
pub struct ChatNotifier {
    subscribers: Arc<Mutex<HashMap<SubscriptionId, Subscriber>>>,
}

impl ChatNotifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for new messages belonging to `subject_id`
    pub fn subscribe(
        &self,
        subject_id: impl Into<String>,
        callback: ChatCallback,
    ) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        let subscriber = Subscriber {
            subject_id: subject_id.into(),
            callback,
        };

        match self.subscribers.lock() {
            Ok(mut subscribers) => {
                subscribers.insert(id, subscriber);
            }
            Err(e) => warn!("Chat notifier registry poisoned on subscribe: {}", e),
        }

        id
    }

    /// Remove a subscription, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.remove(&id).is_some(),
            Err(e) => {
                warn!("Chat notifier registry poisoned on unsubscribe: {}", e);
                false
            }
        }
    }

    /// Deliver a stored message to the subscribers watching its subject
    pub fn publish(&self, message: &ChatMessage) {
        match self.subscribers.lock() {
            Ok(subscribers) => {
                for subscriber in subscribers.values() {
                    if subscriber.subject_id == message.subject_id {
                        (subscriber.callback)(message);
                    }
                }
            }
            Err(e) => warn!("Chat notifier registry poisoned on publish: {}", e),
        }
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn message(subject: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            subject_id: subject.to_string(),
            user_message: "hello".to_string(),
            ai_response: "hi".to_string(),
            topic: Some("general".to_string()),
            created_at: "2026-08-01T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn callbacks_fire_for_matching_subject_only() {
        let notifier = ChatNotifier::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = Arc::clone(&seen);
        notifier.subscribe("subj-1", Box::new(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        }));

        notifier.publish(&message("subj-1"));
        notifier.publish(&message("subj-2"));

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_callbacks_never_fire_again() {
        let notifier = ChatNotifier::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = Arc::clone(&seen);
        let id = notifier.subscribe("subj-1", Box::new(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        }));

        notifier.publish(&message("subj-1"));
        assert!(notifier.unsubscribe(id));
        notifier.publish(&message("subj-1"));

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.subscriber_count(), 0);

        // Double-unsubscribe is a no-op
        assert!(!notifier.unsubscribe(id));
    }
}
