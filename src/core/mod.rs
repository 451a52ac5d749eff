//! Core building blocks of the state machine.
//!
//! This module contains the pieces the machine is assembled from:
//! - State definitions via the `State` trait, and `StateSet` queries
//! - The validated, immutable `TransitionGraph`
//! - The keyed `CallbackTable` used by branch builders
//!
//! Nothing here holds mutable machine state.

mod callback;
mod graph;
mod state;

pub use callback::{bind, Callback, CallbackError, CallbackTable};
pub use graph::TransitionGraph;
pub use state::{State, StateSet};
