//! Core State trait for state machine states.
//!
//! States are opaque identifiers drawn from a fixed set declared when a
//! machine is constructed. Anything that is cheap to clone, totally ordered,
//! hashable and serializable can serve as a state; `String` works out of the
//! box and enums can derive everything through [`state_enum!`](crate::state_enum).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the machine hands out copies of the current state
/// - `Eq` + `Hash`: states key listener lists and branch tables
/// - `Ord`: the declared state list is kept sorted
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: machines can be configured from JSON
///
/// # Example
///
/// ```rust
/// use engineering::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
/// enum Gate {
///     Open,
///     Closed,
/// }
///
/// impl State for Gate {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "open",
///             Self::Closed => "closed",
///         }
///     }
/// }
///
/// assert_eq!(Gate::Open.name(), "open");
/// assert_eq!("open".to_string().name(), "open");
/// ```
pub trait State:
    Clone + Eq + Ord + Hash + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Get the state's name for display and error messages.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self
    }
}

/// One state or a list of states, as accepted by [`Machine::is`](crate::Machine::is).
///
/// Conversions exist from a single state, a `Vec`, an array or a slice of
/// states, and for `String` machines from the equivalent `&str` forms, so
/// callers rarely name this type directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateSet<S> {
    Single(S),
    List(Vec<S>),
}

impl<S: State> StateSet<S> {
    /// Check whether `state` is a member of the set.
    pub fn contains(&self, state: &S) -> bool {
        match self {
            Self::Single(single) => single == state,
            Self::List(list) => list.iter().any(|s| s == state),
        }
    }
}

impl<S: State> From<S> for StateSet<S> {
    fn from(state: S) -> Self {
        Self::Single(state)
    }
}

impl<S: State> From<Vec<S>> for StateSet<S> {
    fn from(states: Vec<S>) -> Self {
        Self::List(states)
    }
}

impl<S: State, const N: usize> From<[S; N]> for StateSet<S> {
    fn from(states: [S; N]) -> Self {
        Self::List(states.into())
    }
}

impl<S: State> From<&[S]> for StateSet<S> {
    fn from(states: &[S]) -> Self {
        Self::List(states.to_vec())
    }
}

impl From<&str> for StateSet<String> {
    fn from(state: &str) -> Self {
        Self::Single(state.to_string())
    }
}

impl From<Vec<&str>> for StateSet<String> {
    fn from(states: Vec<&str>) -> Self {
        Self::List(states.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StateSet<String> {
    fn from(states: [&str; N]) -> Self {
        Self::List(states.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[&str]> for StateSet<String> {
    fn from(states: &[&str]) -> Self {
        Self::List(states.iter().map(|s| s.to_string()).collect())
    }
}
