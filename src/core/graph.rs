//! Validated transition graph.
//!
//! The graph is built once from an adjacency map and the default state, and
//! is never mutated afterwards. Validation is all-or-nothing: either every
//! successor and the default are declared states, or construction fails with
//! the first offending name.

use super::state::State;
use crate::builder::error::ConfigError;
use std::collections::{BTreeMap, BTreeSet};

/// Immutable adjacency structure over a fixed, sorted set of states.
///
/// # Example
///
/// ```rust
/// use engineering::core::TransitionGraph;
/// use std::collections::BTreeMap;
///
/// let adjacency = BTreeMap::from([
///     ("closed".to_string(), vec!["open".to_string()]),
///     ("open".to_string(), vec!["closed".to_string()]),
/// ]);
///
/// let graph = TransitionGraph::new(adjacency, "closed".to_string()).unwrap();
///
/// assert_eq!(graph.states(), vec!["closed".to_string(), "open".to_string()]);
/// assert!(graph.allows(&"closed".to_string(), &"open".to_string()));
/// assert!(!graph.allows(&"open".to_string(), &"open".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionGraph<S: State> {
    states: Vec<S>,
    transitions: BTreeMap<S, BTreeSet<S>>,
    initial: S,
}

impl<S: State> TransitionGraph<S> {
    /// Validate an adjacency map and default state.
    ///
    /// Successor lists are sorted and deduplicated. States are checked in
    /// sorted order, so the reported unknown successor is deterministic.
    pub fn new(adjacency: BTreeMap<S, Vec<S>>, initial: S) -> Result<Self, ConfigError> {
        let states: Vec<S> = adjacency.keys().cloned().collect();

        let mut transitions = BTreeMap::new();
        for (state, successors) in adjacency {
            let allowed: BTreeSet<S> = successors.into_iter().collect();

            if let Some(unknown) = allowed.iter().find(|s| states.binary_search(s).is_err()) {
                return Err(ConfigError::UnknownTransition {
                    state: unknown.name().to_string(),
                });
            }

            transitions.insert(state, allowed);
        }

        if states.binary_search(&initial).is_err() {
            return Err(ConfigError::InvalidDefault {
                state: initial.name().to_string(),
            });
        }

        Ok(Self {
            states,
            transitions,
            initial,
        })
    }

    /// Fresh copy of the declared states, sorted.
    pub fn states(&self) -> Vec<S> {
        self.states.clone()
    }

    /// The default starting state.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check whether `state` was declared.
    pub fn contains(&self, state: &S) -> bool {
        self.transitions.contains_key(state)
    }

    /// Legal successors of `state`, or `None` if it was never declared.
    pub fn successors(&self, state: &S) -> Option<&BTreeSet<S>> {
        self.transitions.get(state)
    }

    /// Check whether moving from `from` to `to` is a declared edge.
    pub fn allows(&self, from: &S, to: &S) -> bool {
        self.successors(from).is_some_and(|allowed| allowed.contains(to))
    }
}
