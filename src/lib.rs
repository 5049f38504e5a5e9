//! # Tracked Collection
//!
//! An ordered collection of records for UI component state, tracked
//! against the baseline it was created with.
//!
//! ## Core Concepts
//!
//! - **Records**: Immutable, reference-counted field maps
//! - **Baseline**: The sequence supplied at construction, fixed for life
//! - **Items**: The current sequence, replaced wholesale by every operation
//! - **Diff**: Created / updated / removed sets derived from `(baseline, items)`
//!   by position and record identity
//!
//! ## Example
//!
//! ```ignore
//! use tracked_collection::{CollectionManager, Record};
//!
//! let manager = CollectionManager::new(vec![
//!     Record::from_value(json!({"name": "original"}))?,
//! ]);
//!
//! manager.create(Record::from_value(json!({"name": "foo"}))?);
//! manager.update(0, "name", json!("renamed"))?;
//! assert!(manager.is_dirty());
//!
//! manager.reset();
//! assert!(!manager.is_dirty());
//! ```

pub mod diff;
pub mod error;
pub mod manager;
pub mod operations;
pub mod snapshot;
pub mod state;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use diff::{compute_diff, created_items, removed_items, updated_items, CollectionDiff};
pub use error::{CollectionError, Result};
pub use manager::{CollectionManager, ManagerConfig};
pub use operations::{apply_operation, CollectionOperation};
pub use snapshot::CollectionSnapshot;
pub use state::{Invalidate, ReactiveCell, StateCell, StateScope};
pub use subscriptions::{
    ChangeSummary, CollectionEvent, DropReason, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
pub use types::*;
