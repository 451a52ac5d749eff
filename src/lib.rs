//! Engineering: a declarative finite state machine
//!
//! Describe the states, which states each one may move to, and where to
//! start. The resulting [`Machine`] refuses every undeclared transition and
//! tells observers, synchronously, about the ones it accepts.
//!
//! # Core Concepts
//!
//! - **State**: any identifier implementing the `State` trait (`String`, or an
//!   enum declared with [`state_enum!`])
//! - **Transition graph**: the validated successor set of every state
//! - **Listeners**: `on` fires on every entry into a state, `once` on the first
//! - **Watches**: `when(..).otherwise(..)` reacts to the very next transition
//! - **Queries**: `is` and `at(..).otherwise(..)` branch on the current state
//! - **Handles**: clones of a `Machine` share it; callbacks that call back in
//!   capture a [`WeakMachine`] from `downgrade` so the machine can be freed
//!
//! # Example
//!
//! ```rust
//! use engineering::Machine;
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let gate: Machine<String, u8> = Machine::from_value(json!({
//!     "states": { "closed": ["open"], "open": ["closed"] },
//!     "default": "closed"
//! }))
//! .unwrap();
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let opened = Rc::clone(&log);
//! gate.on("open", move |args| opened.borrow_mut().push(format!("opened {args:?}")));
//!
//! gate.to("open", [1]).unwrap();
//! assert!(gate.to("open", []).is_err());
//!
//! let next = Rc::clone(&log);
//! gate.when("closed", move |_| next.borrow_mut().push("closed next".to_string()))
//!     .otherwise(|_| {});
//! gate.to("closed", []).unwrap();
//!
//! let state = gate.at("open", |_| "open").otherwise(|_| "not open");
//!
//! assert_eq!(*log.borrow(), vec!["opened [1]", "closed next"]);
//! assert_eq!(state, "not open");
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{ConfigError, MachineBuilder, MachineConfig};
pub use crate::core::{CallbackError, CallbackTable, State, StateSet, TransitionGraph};
pub use engine::{Machine, Query, TransitionError, Watch, WeakMachine};
