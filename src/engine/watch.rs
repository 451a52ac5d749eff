//! Future-transition watches built by [`Machine::when`].

use super::machine::Machine;
use crate::core::{CallbackTable, State};
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use tracing::debug;

/// Key of a branch inside a watch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Branch<S> {
    State(S),
    Otherwise,
}

/// Branches of a watch that has not seen its transition yet.
///
/// Shared between the [`Watch`] handed to the caller and the machine's
/// pending list. Resolving takes the table out, which leaves the watch
/// permanently resolved even if the caller keeps chaining on it.
pub(crate) struct PendingWatch<S, A: 'static> {
    branches: Rc<RefCell<Option<CallbackTable<'static, Branch<S>, A>>>>,
}

impl<S: State, A: 'static> PendingWatch<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            branches: Rc::new(RefCell::new(Some(CallbackTable::new()))),
        }
    }

    fn add<F>(&self, branch: Branch<S>, callback: F)
    where
        F: Fn(&[A]) + 'static,
    {
        if let Some(table) = self.branches.borrow_mut().as_mut() {
            table.set(branch, callback);
        }
    }

    /// Fire the branch matching `target`, falling back to the default.
    ///
    /// Returns whether any callback ran. A watch resolves at most once.
    pub(crate) fn resolve(&self, target: &S, args: &[A]) -> bool {
        let taken = self.branches.borrow_mut().take();
        let Some(table) = taken else {
            return false;
        };

        let matched = Branch::State(target.clone());
        let fired = if table.has(&matched) {
            table.apply(&matched, args).is_ok()
        } else if table.has(&Branch::Otherwise) {
            table.apply(&Branch::Otherwise, args).is_ok()
        } else {
            false
        };

        debug!(state = target.name(), fired, "resolved pending watch");
        fired
    }
}

impl<S, A: 'static> Clone for PendingWatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            branches: Rc::clone(&self.branches),
        }
    }
}

enum Status<S, A: 'static> {
    Pending(PendingWatch<S, A>),
    /// The watched state was already current when the watch was created.
    Settled,
}

/// Chainable watch on the machine's very next transition.
///
/// Returned by [`Machine::when`]. Add more branches with [`when`](Self::when)
/// and finish with [`otherwise`](Self::otherwise), which hands back the
/// machine. Whatever the next transition is, it resolves the watch exactly
/// once: the matching branch fires, else the default, else nothing.
///
/// If the first watched state was already current, its callback has fired
/// and the watch is settled: every further call on it is a no-op.
///
/// A watch dereferences to its machine, so `is`, `on` or `to` can be called
/// straight off the chain.
///
/// # Example
///
/// ```rust
/// use engineering::{Machine, MachineBuilder};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let light: Machine<String> = MachineBuilder::new()
///     .state("red", ["green"])
///     .state("green", ["amber"])
///     .state("amber", ["red"])
///     .initial("red")
///     .build()
///     .unwrap();
///
/// let went_amber = Rc::new(Cell::new(false));
/// let fell_through = Rc::new(Cell::new(false));
///
/// let (amber, other) = (Rc::clone(&went_amber), Rc::clone(&fell_through));
/// light
///     .when("amber", move |_| amber.set(true))
///     .otherwise(move |_| other.set(true));
///
/// light.to("green", []).unwrap();
///
/// assert!(!went_amber.get());
/// assert!(fell_through.get());
/// ```
pub struct Watch<'m, S: State, A: 'static> {
    machine: &'m Machine<S, A>,
    status: Status<S, A>,
}

impl<'m, S: State, A: 'static> Watch<'m, S, A> {
    pub(crate) fn pending(machine: &'m Machine<S, A>, watch: PendingWatch<S, A>) -> Self {
        Self {
            machine,
            status: Status::Pending(watch),
        }
    }

    pub(crate) fn settled(machine: &'m Machine<S, A>) -> Self {
        Self {
            machine,
            status: Status::Settled,
        }
    }

    /// Add a branch for `state`. Watching the same state twice keeps the
    /// latest callback.
    pub fn when<F>(self, state: impl Into<S>, callback: F) -> Self
    where
        F: Fn(&[A]) + 'static,
    {
        if let Status::Pending(watch) = &self.status {
            watch.add(Branch::State(state.into()), callback);
        }
        self
    }

    /// Add the default branch and return the machine.
    pub fn otherwise<F>(self, callback: F) -> &'m Machine<S, A>
    where
        F: Fn(&[A]) + 'static,
    {
        if let Status::Pending(watch) = &self.status {
            watch.add(Branch::Otherwise, callback);
        }
        self.machine
    }

    /// Whether the watch was satisfied immediately on creation.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, Status::Settled)
    }
}

impl<S: State, A: 'static> Deref for Watch<'_, S, A> {
    type Target = Machine<S, A>;

    fn deref(&self) -> &Self::Target {
        self.machine
    }
}

impl<S: State, A: 'static> fmt::Debug for Watch<'_, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}
