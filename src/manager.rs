//! The collection manager.

use crate::diff::{compute_diff, CollectionDiff};
use crate::error::{CollectionError, Result};
use crate::operations::{apply_operation, CollectionOperation};
use crate::snapshot::CollectionSnapshot;
use crate::state::{ReactiveCell, StateCell};
use crate::subscriptions::{
    ChangeSummary, CollectionEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
use crate::types::{Items, Record, Version};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Manager configuration.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Reuse the last computed diff while the current sequence is unchanged.
    pub memoize_diff: bool,

    /// Emit a debug event per installed operation.
    pub log_operations: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            memoize_diff: true,
            log_operations: true,
        }
    }
}

/// An ordered record collection tracked against a fixed baseline.
///
/// Provides:
/// - Mutations (`create`, `remove`, `update`, `reset`), each installing a
///   fresh sequence in the state cell
/// - Derived views (`created_items`, `updated_items`, `removed_items`,
///   `is_dirty`) recomputed from `(baseline, items)`
/// - Change subscriptions for observers
pub struct CollectionManager<C: StateCell<Items> = ReactiveCell<Items>> {
    /// Manager configuration.
    config: ManagerConfig,

    /// Sequence captured at construction. Never replaced.
    baseline: Items,

    /// Holds the current sequence.
    cell: C,

    /// Last computed diff and the sequence it was computed for.
    memo: Mutex<Option<(Items, Arc<CollectionDiff>)>>,

    /// Number of installed sequences since construction.
    version: AtomicU64,

    /// Change observers.
    subscriptions: SubscriptionManager,

    /// Serialises operations so versions and events follow call order.
    write_lock: Mutex<()>,
}

impl CollectionManager {
    /// Create a manager over `baseline` with default configuration.
    pub fn new(baseline: impl IntoIterator<Item = Record>) -> Self {
        Self::with_config(baseline, ManagerConfig::default())
    }

    /// Create a manager over `baseline` with a custom configuration.
    pub fn with_config(baseline: impl IntoIterator<Item = Record>, config: ManagerConfig) -> Self {
        Self::with_cell(baseline.into_iter().collect(), ReactiveCell::default(), config)
    }

    /// Register a callback run after every installed sequence.
    pub fn on_replace(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.cell.on_replace(callback);
    }
}

impl<C: StateCell<Items>> CollectionManager<C> {
    /// Create a manager whose current sequence lives in a host-provided cell.
    ///
    /// The cell is reset to a copy of `baseline`.
    pub fn with_cell(baseline: Items, cell: C, config: ManagerConfig) -> Self {
        cell.replace(Items::from(baseline.to_vec()));

        Self {
            config,
            baseline,
            cell,
            memo: Mutex::new(None),
            version: AtomicU64::new(0),
            subscriptions: SubscriptionManager::new(),
            write_lock: Mutex::new(()),
        }
    }

    // --- Operations ---

    /// Append a record.
    pub fn create(&self, record: Record) {
        self.apply_infallible(CollectionOperation::Create {
            records: vec![record],
        });
    }

    /// Append records in the given order.
    pub fn create_many(&self, records: impl IntoIterator<Item = Record>) {
        self.apply_infallible(CollectionOperation::Create {
            records: records.into_iter().collect(),
        });
    }

    /// Remove the record at `index`. Later records shift down by one.
    ///
    /// When removing several records, go from the highest index down or
    /// re-derive indices after each call.
    pub fn remove(&self, index: usize) -> Result<()> {
        self.apply(CollectionOperation::Remove { index })
    }

    /// Replace the record at `index` with a copy whose `field` is `value`.
    pub fn update(&self, index: usize, field: impl Into<String>, value: Value) -> Result<()> {
        self.apply(CollectionOperation::Update {
            index,
            field: field.into(),
            value,
        })
    }

    /// Discard all mutations and return to the baseline.
    pub fn reset(&self) {
        self.apply_infallible(CollectionOperation::Reset);
    }

    /// Apply an operation, installing the resulting sequence.
    ///
    /// On error the current sequence is left unchanged. Cell dependents are
    /// notified after the write lock is released, so they may issue further
    /// operations on this manager.
    pub fn apply(&self, operation: CollectionOperation) -> Result<()> {
        self.install(operation)?;
        self.cell.notify();
        Ok(())
    }

    /// Create and reset have no failure path.
    fn apply_infallible(&self, operation: CollectionOperation) {
        let result = self.apply(operation);
        debug_assert!(result.is_ok(), "infallible operation failed: {result:?}");
    }

    fn install(&self, operation: CollectionOperation) -> Result<()> {
        let _lock = self.write_lock.lock();

        let name = operation.name();
        let label = self.config.log_operations.then(|| operation.to_string());
        let was_dirty = self.diff().is_dirty();

        let next = self
            .cell
            .try_update(|current| apply_operation(current, &self.baseline, operation))
            .map_err(|e| {
                if let CollectionError::OutOfBounds { index, len } = e {
                    warn!(op = name, index, len, "operation index out of bounds");
                }
                e
            })?;

        let version = Version(self.version.fetch_add(1, Ordering::SeqCst) + 1);
        let diff = self.diff_for(&next);

        if let Some(label) = label {
            debug!(%version, op = %label, len = next.len(), dirty = diff.is_dirty(), "installed sequence");
        }

        let change = ChangeSummary::from_diff(version, Some(name), next.len(), &diff, was_dirty);
        self.subscriptions.broadcast_change(&change);

        Ok(())
    }

    // --- Views ---

    /// The current sequence.
    pub fn items(&self) -> Items {
        self.cell.get()
    }

    /// The cell holding the current sequence.
    pub fn cell(&self) -> &C {
        &self.cell
    }

    /// The sequence captured at construction.
    pub fn baseline(&self) -> &Items {
        &self.baseline
    }

    /// Number of records in the current sequence.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Whether the current sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Number of installed sequences since construction.
    pub fn version(&self) -> Version {
        Version(self.version.load(Ordering::SeqCst))
    }

    /// All three change sets of the current sequence.
    pub fn diff(&self) -> Arc<CollectionDiff> {
        self.diff_for(&self.items())
    }

    /// Records appended past the baseline length.
    pub fn created_items(&self) -> Vec<Record> {
        self.diff().created.clone()
    }

    /// Records at baseline positions that are no longer the baseline record.
    pub fn updated_items(&self) -> Vec<Record> {
        self.diff().updated.clone()
    }

    /// Baseline records whose position no longer exists.
    pub fn removed_items(&self) -> Vec<Record> {
        self.diff().removed.clone()
    }

    /// True if any change set is non-empty.
    pub fn is_dirty(&self) -> bool {
        self.diff().is_dirty()
    }

    /// Serializable picture of the manager's state.
    pub fn snapshot(&self) -> CollectionSnapshot {
        let items = self.items();
        let diff = self.diff_for(&items);
        CollectionSnapshot {
            version: self.version(),
            baseline: self.baseline.clone(),
            items,
            dirty: diff.is_dirty(),
            diff: (*diff).clone(),
        }
    }

    fn diff_for(&self, items: &Items) -> Arc<CollectionDiff> {
        if !self.config.memoize_diff {
            return Arc::new(compute_diff(&self.baseline, items));
        }

        let mut memo = self.memo.lock();
        if let Some((ref key, ref diff)) = *memo {
            if key.ptr_eq(items) {
                trace!("reusing memoized diff");
                return Arc::clone(diff);
            }
        }

        trace!(len = items.len(), "recomputing diff");
        let diff = Arc::new(compute_diff(&self.baseline, items));
        *memo = Some((items.clone(), Arc::clone(&diff)));
        diff
    }

    // --- Subscriptions ---

    /// Subscribe to change events.
    pub fn subscribe(&self, config: SubscriptionConfig) -> Result<SubscriptionHandle> {
        let replay = config.replay_current;
        let handle = self.subscriptions.subscribe(config);

        if replay {
            let items = self.items();
            let diff = self.diff_for(&items);
            let change =
                ChangeSummary::from_diff(self.version(), None, items.len(), &diff, diff.is_dirty());
            if !self
                .subscriptions
                .send_to(handle.id, CollectionEvent::Current { change })
            {
                self.subscriptions.unsubscribe(handle.id);
                return Err(CollectionError::SubscriptionDropped);
            }
        }

        Ok(handle)
    }

    /// Unsubscribe an observer.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    /// Number of active observers.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }
}
