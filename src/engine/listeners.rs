//! Per-state listener lists.

use crate::core::State;
use std::collections::HashMap;
use std::rc::Rc;

/// A registered listener. Shared so a dispatch can snapshot the list and
/// release the registry before any user code runs.
pub(crate) type Listener<A> = Rc<dyn Fn(&[A])>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lifetime {
    /// Fires on every transition into the state.
    Persistent,
    /// Fires on the first transition into the state, then is dropped.
    Once,
}

struct Registration<A> {
    listener: Listener<A>,
    lifetime: Lifetime,
}

/// Ordered listener lists keyed by target state.
pub(crate) struct Listeners<S, A> {
    by_state: HashMap<S, Vec<Registration<A>>>,
}

impl<S: State, A> Listeners<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            by_state: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, state: S, listener: Listener<A>, lifetime: Lifetime) {
        self.by_state
            .entry(state)
            .or_default()
            .push(Registration { listener, lifetime });
    }

    /// Snapshot the listeners for `state` in registration order, dropping
    /// one-shot registrations from the registry as they are handed out.
    pub(crate) fn take_for(&mut self, state: &S) -> Vec<Listener<A>> {
        let Some(registrations) = self.by_state.get_mut(state) else {
            return Vec::new();
        };

        let snapshot = registrations
            .iter()
            .map(|r| Rc::clone(&r.listener))
            .collect();
        registrations.retain(|r| r.lifetime == Lifetime::Persistent);

        snapshot
    }

    /// Number of listeners currently registered for `state`.
    pub(crate) fn count(&self, state: &S) -> usize {
        self.by_state.get(state).map_or(0, Vec::len)
    }
}
