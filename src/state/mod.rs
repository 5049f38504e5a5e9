//! State retention for hosting UI scopes.
//!
//! A manager keeps its current sequence in a [`StateCell`]: a holder with
//! `get` and `replace`, where `replace` lets the host re-read derived views.
//! [`ReactiveCell`] is the built-in cell; [`StateScope`] keeps managers
//! alive across repeated invocations of the owning scope.

mod cell;
mod scope;

pub use cell::{Invalidate, ReactiveCell, StateCell};
pub use scope::StateScope;
