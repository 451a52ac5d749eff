//! Transition errors.

use thiserror::Error;

/// Errors that can occur when requesting a transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// `state` is not a declared successor of `from`. The machine is unchanged.
    #[error("Invalid transition: {state}")]
    InvalidTransition { from: String, state: String },
}
