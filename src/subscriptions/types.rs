//! Subscription types for collection observers.

use crate::diff::CollectionDiff;
use crate::types::Version;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Send a `Current` event describing the present state on subscribe.
    pub replay_current: bool,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            replay_current: false,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only these operation names (None = all operations).
    pub operations: Option<Vec<String>>,

    /// Only changes that flip the dirty flag.
    pub dirty_transitions_only: bool,
}

impl SubscriptionFilter {
    /// Subscribe to every change.
    pub fn all() -> Self {
        Self::default()
    }

    /// Subscribe to specific operations ("create", "remove", "update", "reset").
    pub fn operations(names: Vec<String>) -> Self {
        Self {
            operations: Some(names),
            ..Default::default()
        }
    }

    /// Subscribe to clean <-> dirty transitions.
    pub fn dirty_transitions() -> Self {
        Self {
            dirty_transitions_only: true,
            ..Default::default()
        }
    }
}

/// Events emitted to observers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionEvent {
    /// A new sequence was installed.
    Changed { change: ChangeSummary },

    /// State at subscribe time (only with `replay_current`).
    Current { change: ChangeSummary },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Summary of an installed sequence (counts, not records).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub version: Version,
    /// Operation name, `None` for the initial state.
    pub operation: Option<String>,
    pub len: usize,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub dirty: bool,
    /// Dirty flag before this change.
    pub was_dirty: bool,
}

impl ChangeSummary {
    /// Build a summary from the diff of the newly installed sequence.
    pub fn from_diff(
        version: Version,
        operation: Option<&str>,
        len: usize,
        diff: &CollectionDiff,
        was_dirty: bool,
    ) -> Self {
        Self {
            version,
            operation: operation.map(str::to_string),
            len,
            created: diff.created.len(),
            updated: diff.updated.len(),
            removed: diff.removed.len(),
            dirty: diff.is_dirty(),
            was_dirty,
        }
    }

    /// Whether the dirty flag flipped.
    pub fn dirty_changed(&self) -> bool {
        self.dirty != self.was_dirty
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<CollectionEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<CollectionEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<CollectionEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<CollectionEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain all pending events without blocking.
    pub fn drain(&self) -> Vec<CollectionEvent> {
        self.receiver.try_iter().collect()
    }
}
