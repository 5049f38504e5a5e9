//! Value cells that survive re-invocation of their owning scope.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// Callback run after a cell's value is replaced.
pub type Invalidate = Arc<dyn Fn() + Send + Sync>;

/// Holder of a single value, replaced wholesale.
///
/// A host UI framework can implement this over its own state primitive so
/// that a replacement schedules a re-render of the owning scope. Installing
/// a value and notifying dependents are separate steps: writers install
/// under their own locks and notify once those locks are released.
pub trait StateCell<T: Clone> {
    /// Current value.
    fn get(&self) -> T;

    /// Install `value` without notifying dependents, returning the previous one.
    fn set(&self, value: T) -> T;

    /// Tell dependents the value changed.
    fn notify(&self) {}

    /// Install `value` and notify dependents, returning the previous one.
    fn replace(&self, value: T) -> T {
        let previous = self.set(value);
        self.notify();
        previous
    }

    /// Compute the next value from the current one and install it.
    ///
    /// On error nothing is installed. Dependents are not notified; call
    /// [`StateCell::notify`] afterwards. Implementations that can be shared
    /// across threads should hold their lock across the whole update.
    fn try_update<E>(&self, f: impl FnOnce(&T) -> Result<T, E>) -> Result<T, E> {
        let next = f(&self.get())?;
        self.set(next.clone());
        Ok(next)
    }
}

/// Default [`StateCell`]: a lock-protected value plus a list of
/// invalidation callbacks.
///
/// Callbacks run outside the value lock, so they may read the cell or
/// trigger further updates.
pub struct ReactiveCell<T> {
    value: RwLock<T>,
    dependents: Mutex<Vec<Invalidate>>,
}

impl<T> ReactiveCell<T> {
    /// Creates a new cell with the specified value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            dependents: Mutex::new(Vec::new()),
        }
    }

    /// Register a callback run after every replacement.
    pub fn on_replace(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.dependents.lock().push(Arc::new(callback));
    }

    /// Number of registered callbacks.
    pub fn dependent_count(&self) -> usize {
        self.dependents.lock().len()
    }
}

impl<T: Clone> StateCell<T> for ReactiveCell<T> {
    fn get(&self) -> T {
        self.value.read().clone()
    }

    fn set(&self, value: T) -> T {
        std::mem::replace(&mut *self.value.write(), value)
    }

    fn notify(&self) {
        // Clone out so callbacks may register more dependents.
        let dependents: Vec<Invalidate> = self.dependents.lock().clone();
        for callback in dependents {
            callback();
        }
    }

    fn try_update<E>(&self, f: impl FnOnce(&T) -> Result<T, E>) -> Result<T, E> {
        let mut value = self.value.write();
        let next = f(&value)?;
        *value = next.clone();
        Ok(next)
    }
}

impl<T: Default> Default for ReactiveCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &*self.value.read())
            .field("dependents", &self.dependent_count())
            .finish()
    }
}
