//! The state machine itself.

use super::error::TransitionError;
use super::listeners::{Lifetime, Listeners};
use super::query::Query;
use super::watch::{PendingWatch, Watch};
use crate::builder::config::MachineConfig;
use crate::builder::error::ConfigError;
use crate::core::{State, StateSet, TransitionGraph};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

struct Inner<S: State, A: 'static> {
    graph: TransitionGraph<S>,
    current: RefCell<S>,
    args: RefCell<Rc<[A]>>,
    listeners: RefCell<Listeners<S, A>>,
    watches: RefCell<Vec<PendingWatch<S, A>>>,
}

/// Finite state machine with synchronous listeners.
///
/// A `Machine` is a cheap handle: cloning it yields another handle to the
/// same machine, and the machine lives as long as some strong handle does.
/// Callbacks that need to reach back into the machine should capture a
/// [`WeakMachine`] from [`downgrade`](Self::downgrade): a strong clone stored
/// inside a listener keeps the machine, and everything its callbacks own,
/// alive forever.
///
/// All dispatch happens inside the call that triggered it, and no internal
/// borrow is held while user callbacks run, so callbacks may query,
/// subscribe or even transition. The handle is neither `Send` nor `Sync`;
/// one machine belongs to one thread.
///
/// `A` is the type of the arguments passed along with each transition.
///
/// # Example
///
/// ```rust
/// use engineering::{Machine, MachineBuilder};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let gate: Machine<String, &str> = MachineBuilder::new()
///     .state("closed", ["open"])
///     .state("open", ["closed"])
///     .initial("closed")
///     .build()
///     .unwrap();
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// gate.on("open", move |args| sink.borrow_mut().extend_from_slice(args));
///
/// gate.to("open", ["by hand"]).unwrap();
///
/// assert!(gate.is("open"));
/// assert_eq!(*seen.borrow(), vec!["by hand"]);
/// assert_eq!(
///     gate.to("open", []).unwrap_err().to_string(),
///     "Invalid transition: open"
/// );
/// ```
pub struct Machine<S: State, A: 'static = ()> {
    inner: Rc<Inner<S, A>>,
}

impl<S: State, A: 'static> Machine<S, A> {
    /// Build a machine from a configuration, starting at its default state
    /// with no arguments.
    pub fn new(config: MachineConfig<S>) -> Result<Self, ConfigError> {
        let graph = config.validate()?;
        debug!(
            states = graph.len(),
            initial = graph.initial().name(),
            "constructed state machine"
        );

        let current = graph.initial().clone();
        Ok(Self {
            inner: Rc::new(Inner {
                graph,
                current: RefCell::new(current),
                args: RefCell::new(Rc::from(Vec::new())),
                listeners: RefCell::new(Listeners::new()),
                watches: RefCell::new(Vec::new()),
            }),
        })
    }

    /// Build a machine from a JSON value shaped like
    /// `{"states": {...}, "default": "..."}`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Self::new(MachineConfig::from_value(value)?)
    }

    /// Build a machine from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(MachineConfig::from_json(json)?)
    }

    /// Fresh copy of the declared states, sorted.
    pub fn states(&self) -> Vec<S> {
        self.inner.graph.states()
    }

    /// The validated transition graph.
    pub fn graph(&self) -> &TransitionGraph<S> {
        &self.inner.graph
    }

    /// Copy of the current state.
    pub fn current(&self) -> S {
        self.inner.current.borrow().clone()
    }

    /// Arguments of the most recent transition (empty before the first).
    pub fn args(&self) -> Rc<[A]> {
        Rc::clone(&self.inner.args.borrow())
    }

    /// Check whether the current state is `states`, or one of them.
    pub fn is(&self, states: impl Into<StateSet<S>>) -> bool {
        states.into().contains(&self.inner.current.borrow())
    }

    /// Like [`is`](Self::is), and when it holds also run `callback` with the
    /// arguments of the most recent transition.
    pub fn is_then<F>(&self, states: impl Into<StateSet<S>>, callback: F) -> bool
    where
        F: FnOnce(&[A]),
    {
        if !self.is(states) {
            return false;
        }

        let args = self.args();
        callback(&args);
        true
    }

    /// Run `callback` every time the machine enters `state`.
    ///
    /// If the machine is already at `state`, `callback` also runs right away
    /// with the current arguments. Listeners for a state run in the order
    /// they were registered.
    pub fn on<F>(&self, state: impl Into<S>, callback: F) -> &Self
    where
        F: Fn(&[A]) + 'static,
    {
        let state = state.into();
        self.is_then(state.clone(), &callback);
        self.inner
            .listeners
            .borrow_mut()
            .add(state, Rc::new(callback), Lifetime::Persistent);
        self
    }

    /// Run `callback` once, the next time the machine is at `state`.
    ///
    /// If the machine is already at `state`, `callback` runs right away and
    /// nothing is registered.
    pub fn once<F>(&self, state: impl Into<S>, callback: F) -> &Self
    where
        F: Fn(&[A]) + 'static,
    {
        let state = state.into();
        if !self.is_then(state.clone(), &callback) {
            self.inner
                .listeners
                .borrow_mut()
                .add(state, Rc::new(callback), Lifetime::Once);
        }
        self
    }

    /// Move to `state`, recording `args` and notifying observers.
    ///
    /// Fails without touching the machine if `state` is not a declared
    /// successor of the current state. On success, listeners registered for
    /// `state` run in registration order, then every watch pending when this
    /// call began is resolved, in creation order. Observers added while this
    /// call is dispatching first see the following transition.
    pub fn to(
        &self,
        state: impl Into<S>,
        args: impl IntoIterator<Item = A>,
    ) -> Result<(), TransitionError> {
        let target = state.into();
        let from = self.current();

        if !self.inner.graph.allows(&from, &target) {
            debug!(
                from = from.name(),
                to = target.name(),
                "rejected transition"
            );
            return Err(TransitionError::InvalidTransition {
                from: from.name().to_string(),
                state: target.name().to_string(),
            });
        }

        let args: Rc<[A]> = args.into_iter().collect();
        let watches = std::mem::take(&mut *self.inner.watches.borrow_mut());

        *self.inner.current.borrow_mut() = target.clone();
        *self.inner.args.borrow_mut() = Rc::clone(&args);
        debug!(
            from = from.name(),
            to = target.name(),
            args = args.len(),
            "transitioned"
        );

        let listeners = self.inner.listeners.borrow_mut().take_for(&target);
        trace!(
            state = target.name(),
            listeners = listeners.len(),
            watches = watches.len(),
            "dispatching"
        );
        for listener in listeners {
            listener(&args);
        }

        for watch in watches {
            watch.resolve(&target, &args);
        }

        Ok(())
    }

    /// Watch the very next transition, starting with a branch for `state`.
    ///
    /// If the machine is already at `state`, `callback` runs right away with
    /// the current arguments and the returned watch is settled: further
    /// branches and the default are ignored. See [`Watch`].
    pub fn when<F>(&self, state: impl Into<S>, callback: F) -> Watch<'_, S, A>
    where
        F: Fn(&[A]) + 'static,
    {
        let state = state.into();
        if self.is_then(state.clone(), &callback) {
            return Watch::settled(self);
        }

        let pending = PendingWatch::new();
        self.inner.watches.borrow_mut().push(pending.clone());
        Watch::pending(self, pending).when(state, callback)
    }

    /// Start an immediate query with a branch for `state`. See [`Query`].
    ///
    /// Unlike listeners, query branches never outlive the query, so they may
    /// borrow from the caller.
    pub fn at<'m, R, F>(&'m self, state: impl Into<S>, callback: F) -> Query<'m, S, A, R>
    where
        F: Fn(&[A]) -> R + 'm,
    {
        Query::new(self).at(state, callback)
    }

    /// Create a handle that does not keep the machine alive.
    ///
    /// # Example
    ///
    /// ```rust
    /// use engineering::{Machine, MachineBuilder};
    ///
    /// let machine: Machine<String, u8> = MachineBuilder::new()
    ///     .state("idle", ["busy"])
    ///     .state("busy", ["idle"])
    ///     .initial("idle")
    ///     .build()
    ///     .unwrap();
    ///
    /// let handle = machine.downgrade();
    /// machine.on("busy", move |_| {
    ///     if let Some(machine) = handle.upgrade() {
    ///         machine.to("idle", []).unwrap();
    ///     }
    /// });
    ///
    /// machine.to("busy", []).unwrap();
    /// assert!(machine.is("idle"));
    /// ```
    pub fn downgrade(&self) -> WeakMachine<S, A> {
        WeakMachine {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of watches waiting for the next transition.
    pub fn pending_watches(&self) -> usize {
        self.inner.watches.borrow().len()
    }

    /// Number of listeners registered for `state`.
    pub fn listener_count(&self, state: &S) -> usize {
        self.inner.listeners.borrow().count(state)
    }
}

impl<S: State, A: 'static> Clone for Machine<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: State, A: 'static> fmt::Debug for Machine<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current())
            .field("states", &self.inner.graph.states())
            .finish_non_exhaustive()
    }
}

/// Non-owning handle to a [`Machine`], for use inside its own callbacks.
pub struct WeakMachine<S: State, A: 'static = ()> {
    inner: Weak<Inner<S, A>>,
}

impl<S: State, A: 'static> WeakMachine<S, A> {
    /// Get a strong handle, or `None` once every strong handle is gone.
    pub fn upgrade(&self) -> Option<Machine<S, A>> {
        self.inner.upgrade().map(|inner| Machine { inner })
    }
}

impl<S: State, A: 'static> Clone for WeakMachine<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S: State, A: 'static> fmt::Debug for WeakMachine<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMachine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
