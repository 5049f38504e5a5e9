//! Subscription manager for broadcasting collection changes.

use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

use super::types::{
    ChangeSummary, CollectionEvent, DropReason, SubscriptionConfig, SubscriptionHandle,
    SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<CollectionEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if buffer is full (subscriber will be dropped).
    fn try_send(&self, event: CollectionEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Check if this subscription matches a change.
    fn matches(&self, change: &ChangeSummary) -> bool {
        let filter = &self.config.filter;

        if filter.dirty_transitions_only && !change.dirty_changed() {
            return false;
        }

        if let Some(ref names) = filter.operations {
            return match change.operation {
                Some(ref op) => names.iter().any(|name| name == op),
                None => false,
            };
        }

        true
    }
}

/// Manages observers and broadcasts changes.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        // A zero-capacity channel would be a rendezvous channel and drop on first send.
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Best effort
            let _ = sub.sender.try_send(CollectionEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Send an event directly to one subscription.
    /// Returns false if the subscription is gone or its buffer is full.
    pub fn send_to(&self, id: SubscriptionId, event: CollectionEvent) -> bool {
        let subs = self.subscriptions.read();
        match subs.get(&id) {
            Some(sub) => sub.try_send(event),
            None => false,
        }
    }

    /// Broadcast a change to matching subscriptions. Drops subscribers that fail to receive.
    pub fn broadcast_change(&self, change: &ChangeSummary) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.matches(change)
                    && !sub.try_send(CollectionEvent::Changed {
                        change: change.clone(),
                    })
                {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    warn!(subscription = id.0, "dropping slow subscriber");
                    let _ = sub.sender.try_send(CollectionEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
