//! Immediate multi-way queries built by [`Machine::at`].

use super::machine::Machine;
use crate::core::{CallbackTable, State};
use std::fmt;

/// Chainable branch evaluated against the current state.
///
/// Returned by [`Machine::at`]. Nothing runs until [`otherwise`](Self::otherwise)
/// is called; it then evaluates once and returns the chosen branch's result.
/// Every callback receives the arguments of the most recent transition.
///
/// # Example
///
/// ```rust
/// use engineering::{Machine, MachineBuilder};
///
/// let gate: Machine<String, u32> = MachineBuilder::new()
///     .state("closed", ["open"])
///     .state("open", ["closed"])
///     .initial("closed")
///     .build()
///     .unwrap();
///
/// gate.to("open", [3]).unwrap();
///
/// let label = gate
///     .at("closed", |_| "shut".to_string())
///     .at("open", |args| format!("open by {}", args[0]))
///     .otherwise(|_| "unknown".to_string());
///
/// assert_eq!(label, "open by 3");
/// ```
pub struct Query<'m, S: State, A: 'static, R> {
    machine: &'m Machine<S, A>,
    branches: CallbackTable<'m, S, A, R>,
}

impl<'m, S: State, A: 'static, R> Query<'m, S, A, R> {
    pub(crate) fn new(machine: &'m Machine<S, A>) -> Self {
        Self {
            machine,
            branches: CallbackTable::new(),
        }
    }

    /// Add a branch taken when the machine is at `state`.
    pub fn at<F>(mut self, state: impl Into<S>, callback: F) -> Self
    where
        F: Fn(&[A]) -> R + 'm,
    {
        self.branches.set(state.into(), callback);
        self
    }

    /// Evaluate now: run the branch for the current state, or `callback`
    /// when no branch matches, and return its result.
    pub fn otherwise<F>(self, callback: F) -> R
    where
        F: FnOnce(&[A]) -> R,
    {
        let current = self.machine.current();
        let args = self.machine.args();

        if !self.branches.has(&current) {
            return callback(&args);
        }
        match self.branches.apply(&current, &args) {
            Ok(result) => result,
            Err(_) => callback(&args),
        }
    }
}

impl<S: State, A: 'static, R> fmt::Debug for Query<'_, S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("branches", &self.branches)
            .finish_non_exhaustive()
    }
}
