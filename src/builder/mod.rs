//! Configuration and builder API for state machines.
//!
//! A machine is made from a [`MachineConfig`]: an adjacency map plus a
//! default state. It can be decoded from JSON, assembled with the fluent
//! [`MachineBuilder`], or written by hand.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;

pub use config::MachineConfig;
pub use error::ConfigError;
pub use machine::MachineBuilder;

use crate::core::State;

/// Start a builder for a ring of states, each leading to the next and the
/// last leading back to the first, which becomes the default.
///
/// # Example
///
/// ```
/// use engineering::builder::cycle;
/// use engineering::Machine;
///
/// let dial: Machine<String> = cycle(["high", "medium", "low", "rest"]).build().unwrap();
///
/// assert!(dial.is("high"));
/// assert!(dial.to("medium", []).is_ok());
/// assert!(dial.to("high", []).is_err());
/// ```
pub fn cycle<S, T>(states: impl IntoIterator<Item = T>) -> MachineBuilder<S>
where
    S: State,
    T: Into<S>,
{
    let states: Vec<S> = states.into_iter().map(Into::into).collect();

    let mut builder = MachineBuilder::new();
    if let Some(first) = states.first() {
        builder = builder.initial(first.clone());
    }
    for (i, state) in states.iter().enumerate() {
        let next = states[(i + 1) % states.len()].clone();
        builder = builder.state(state.clone(), [next]);
    }
    builder
}
