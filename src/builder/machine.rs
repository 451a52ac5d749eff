//! Builder for constructing state machines.

use crate::builder::config::MachineConfig;
use crate::builder::error::ConfigError;
use crate::core::State;
use crate::engine::Machine;
use std::collections::BTreeMap;

/// Builder for constructing state machines with a fluent API.
pub struct MachineBuilder<S: State> {
    states: BTreeMap<S, Vec<S>>,
    default: Option<S>,
}

impl<S: State> MachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            default: None,
        }
    }

    /// Declare `state` and the states reachable from it. Declaring the same
    /// state again replaces its successors.
    pub fn state<T>(mut self, state: impl Into<S>, successors: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<S>,
    {
        self.states.insert(
            state.into(),
            successors.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Declare `state` with no outgoing transitions.
    pub fn sink(mut self, state: impl Into<S>) -> Self {
        self.states.insert(state.into(), Vec::new());
        self
    }

    /// Declare several states at once.
    pub fn states<I, T>(mut self, states: impl IntoIterator<Item = (T, I)>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<S>,
    {
        for (state, successors) in states {
            self = self.state(state, successors);
        }
        self
    }

    /// Set the default starting state (required).
    pub fn initial(mut self, state: impl Into<S>) -> Self {
        self.default = Some(state.into());
        self
    }

    /// The configuration assembled so far. A builder with no declared
    /// states has no transition map.
    pub fn config(self) -> MachineConfig<S> {
        MachineConfig {
            states: (!self.states.is_empty()).then_some(self.states),
            default: self.default,
        }
    }

    /// Build the state machine.
    /// Returns an error if the configuration is incomplete or inconsistent.
    pub fn build<A: 'static>(self) -> Result<Machine<S, A>, ConfigError> {
        Machine::new(self.config())
    }
}

impl<S: State> Default for MachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
