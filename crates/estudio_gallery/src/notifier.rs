//! Change notifications for gallery collections.
//!
//! Every mutation publishes a [`GalleryEvent`]. Listeners subscribe to one
//! category and re-read the whole collection when notified.

use crate::GalleryCategory;
use estudio_core::EntityId;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 256;

/// What happened to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum GalleryChange {
    /// An entity was inserted or replaced
    Saved,
    /// An entity was removed
    Deleted,
}

/// A collection changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEvent {
    /// Collection that changed
    pub category: GalleryCategory,
    /// Kind of change
    pub change: GalleryChange,
    /// Entity affected
    pub id: EntityId,
}

/// Fan-out publisher of [`GalleryEvent`]s.
#[derive(Debug, Clone)]
pub struct GalleryNotifier {
    sender: broadcast::Sender<GalleryEvent>,
}

impl GalleryNotifier {
    /// Create a notifier with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to current subscribers.
    pub fn publish(&self, event: GalleryEvent) {
        debug!(category = %event.category, change = %event.change, id = %event.id, "Gallery changed");
        // No receivers is fine.
        let _ = self.sender.send(event);
    }

    /// Subscribe to one category.
    pub fn subscribe(&self, category: GalleryCategory) -> GallerySubscription {
        GallerySubscription {
            category,
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for GalleryNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Receives the events of one category.
#[derive(Debug)]
pub struct GallerySubscription {
    category: GalleryCategory,
    receiver: broadcast::Receiver<GalleryEvent>,
}

impl GallerySubscription {
    /// Category this subscription listens to.
    pub fn category(&self) -> GalleryCategory {
        self.category
    }

    /// Wait for the next event of this category.
    ///
    /// Returns `None` once every notifier is dropped. Events missed because
    /// the receiver lagged are skipped.
    pub async fn recv(&mut self) -> Option<GalleryEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.category == self.category => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    debug!(category = %self.category, missed, "Gallery subscription lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_filters_by_category() {
        let notifier = GalleryNotifier::default();
        let mut scenes = notifier.subscribe(GalleryCategory::Scenes);

        notifier.publish(GalleryEvent {
            category: GalleryCategory::Characters,
            change: GalleryChange::Saved,
            id: EntityId::from("c1"),
        });
        notifier.publish(GalleryEvent {
            category: GalleryCategory::Scenes,
            change: GalleryChange::Deleted,
            id: EntityId::from("s1"),
        });

        let event = scenes.recv().await.unwrap();
        assert_eq!(event.id, EntityId::from("s1"));
        assert_eq!(event.change, GalleryChange::Deleted);
    }
}
