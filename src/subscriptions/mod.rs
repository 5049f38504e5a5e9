//! Observer subscriptions for collection changes.
//!
//! Every installed sequence is reported to matching observers as a
//! [`CollectionEvent::Changed`]. Subscriptions support:
//! - Filtering by operation name or by dirty-flag transitions
//! - An optional `Current` event on subscribe
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = manager.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::dirty_transitions(),
//!     ..Default::default()
//! })?;
//!
//! manager.create(record);
//!
//! match handle.recv() {
//!     Ok(CollectionEvent::Changed { change }) => rerender(change.dirty),
//!     _ => {}
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    ChangeSummary, CollectionEvent, DropReason, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId,
};
