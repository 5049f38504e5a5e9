//! Retention of collection managers across scope re-invocations.

use crate::manager::{CollectionManager, ManagerConfig};
use crate::types::Record;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A table of managers keyed by call site, owned by one component instance.
///
/// The first `use_collection` for a key constructs the manager; later calls
/// with the same key return the same manager and ignore `init`. A manager's
/// baseline is therefore the one supplied on first use, and `reset` always
/// restores that value.
#[derive(Default)]
pub struct StateScope {
    collections: RwLock<HashMap<String, Arc<CollectionManager>>>,
}

impl StateScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the manager for `key`.
    pub fn use_collection<I>(&self, key: &str, init: impl FnOnce() -> I) -> Arc<CollectionManager>
    where
        I: IntoIterator<Item = Record>,
    {
        self.use_collection_with_config(key, init, ManagerConfig::default)
    }

    /// Get or create the manager for `key` with a custom configuration.
    pub fn use_collection_with_config<I>(
        &self,
        key: &str,
        init: impl FnOnce() -> I,
        config: impl FnOnce() -> ManagerConfig,
    ) -> Arc<CollectionManager>
    where
        I: IntoIterator<Item = Record>,
    {
        if let Some(manager) = self.collections.read().get(key) {
            return Arc::clone(manager);
        }

        // Built outside the lock: `init` may use other keys of this scope.
        let created = Arc::new(CollectionManager::with_config(init(), config()));
        let mut collections = self.collections.write();
        let manager = collections.entry(key.to_string()).or_insert_with(|| {
            debug!(key, "creating collection");
            created
        });
        Arc::clone(manager)
    }

    /// Drop the manager for `key`. Returns false if there was none.
    pub fn release(&self, key: &str) -> bool {
        self.collections.write().remove(key).is_some()
    }

    /// Number of retained managers.
    pub fn len(&self) -> usize {
        self.collections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.read().is_empty()
    }
}
