//! The machine core and its branch builders.
//!
//! - [`Machine`]: current state, last arguments, listeners and transitions
//! - [`Watch`]: chain returned by [`Machine::when`], resolved by the next transition
//! - [`Query`]: chain returned by [`Machine::at`], evaluated immediately
//!
//! Dispatch is synchronous. Listeners for a transition run in registration
//! order, and pending watches resolve only after all of them have run.

mod error;
mod listeners;
mod machine;
mod query;
mod watch;

pub use error::TransitionError;
pub use machine::{Machine, WeakMachine};
pub use query::Query;
pub use watch::Watch;
