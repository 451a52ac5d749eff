//! Declarative machine configuration.
//!
//! The accepted shape is
//!
//! ```json
//! { "states": { "closed": ["open"], "open": ["closed"] }, "default": "closed" }
//! ```
//!
//! where `states` maps every declared state to the states reachable from it.

use super::error::ConfigError;
use crate::core::{State, TransitionGraph};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Adjacency map plus default state, as supplied by the caller.
///
/// Both fields are optional so that a missing piece is reported as the
/// matching [`ConfigError`] rather than a generic decoding failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineConfig<S: State> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<BTreeMap<S, Vec<S>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<S>,
}

impl<S: State> MachineConfig<S> {
    pub fn new(states: BTreeMap<S, Vec<S>>, default: S) -> Self {
        Self {
            states: Some(states),
            default: Some(default),
        }
    }

    /// Read a configuration out of an arbitrary JSON value, checking its
    /// shape the way a hand-written options object would be checked.
    ///
    /// # Example
    ///
    /// ```rust
    /// use engineering::{ConfigError, MachineConfig};
    /// use serde_json::json;
    ///
    /// let config = MachineConfig::<String>::from_value(json!({
    ///     "states": { "closed": ["open"], "open": ["closed"] },
    ///     "default": "closed"
    /// }));
    /// assert!(config.is_ok());
    ///
    /// let missing = MachineConfig::<String>::from_value(json!({ "default": "open" }));
    /// assert_eq!(missing, Err(ConfigError::ExpectedTransitionMap));
    /// ```
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let mut options = match value {
            Value::Null => return Err(ConfigError::MissingOptions),
            Value::Object(options) => options,
            _ => return Err(ConfigError::ExpectedTransitionMap),
        };

        let Some(Value::Object(states)) = options.remove("states") else {
            return Err(ConfigError::ExpectedTransitionMap);
        };

        let default = match options.remove("default") {
            None | Some(Value::Null) => return Err(ConfigError::ExpectedDefault),
            Some(default) => default,
        };

        let mut adjacency = BTreeMap::new();
        for (name, successors) in states {
            let state: S = serde_json::from_value(Value::String(name.clone()))
                .map_err(|e| ConfigError::Malformed(format!("state `{name}`: {e}")))?;

            let Value::Array(successors) = successors else {
                return Err(ConfigError::Malformed(format!(
                    "transitions of `{name}` must be a list"
                )));
            };

            let successors = successors
                .into_iter()
                .map(|successor| {
                    serde_json::from_value(successor.clone()).map_err(|_| {
                        ConfigError::UnknownTransition {
                            state: display(&successor),
                        }
                    })
                })
                .collect::<Result<Vec<S>, _>>()?;

            adjacency.insert(state, successors);
        }

        let default: S =
            serde_json::from_value(default.clone()).map_err(|_| ConfigError::InvalidDefault {
                state: display(&default),
            })?;

        Ok(Self::new(adjacency, default))
    }

    /// Parse a JSON document and read it with [`from_value`](Self::from_value).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Check presence of both fields and validate the graph.
    pub fn validate(self) -> Result<TransitionGraph<S>, ConfigError> {
        let states = self.states.ok_or(ConfigError::ExpectedTransitionMap)?;
        let default = self.default.ok_or(ConfigError::ExpectedDefault)?;
        TransitionGraph::new(states, default)
    }
}

impl<S: State> Default for MachineConfig<S> {
    fn default() -> Self {
        Self {
            states: None,
            default: None,
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
