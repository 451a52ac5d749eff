//! Configuration errors for machine construction.

use thiserror::Error;

/// Errors that can occur when building a state machine.
///
/// Construction is all-or-nothing: any of these means no machine was made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Expected options")]
    MissingOptions,

    #[error("Expected map of state transitions")]
    ExpectedTransitionMap,

    #[error("Expected default state")]
    ExpectedDefault,

    #[error("Unknown state transition: {state}")]
    UnknownTransition { state: String },

    #[error("Invalid default state: {state}")]
    InvalidDefault { state: String },

    /// The input had the right shape but a name could not be decoded.
    #[error("Malformed configuration: {0}")]
    Malformed(String),
}
