//! Keyed store of bound callbacks.
//!
//! A [`CallbackTable`] maps an opaque key to a callback that has already been
//! bound to whatever context it needs. Branch builders use one privately to
//! decide which callback, if any, a state resolves to.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// A boxed callback receiving the ordered argument sequence.
pub type Callback<'f, A, R = ()> = Box<dyn Fn(&[A]) -> R + 'f>;

/// Errors raised by [`CallbackTable::apply`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Cannot invoke unknown callback")]
    UnknownCallback,
}

/// Keyed store mapping a key to a bound callback.
///
/// Setting an existing key overwrites it. Applying a key that was never set
/// fails with [`CallbackError::UnknownCallback`]; callers that cannot rule
/// that out guard with [`has`](Self::has) first.
///
/// # Example
///
/// ```rust
/// use engineering::core::{bind, CallbackTable};
///
/// let mut table: CallbackTable<&str, i32, i32> = CallbackTable::new();
/// table.set("sum", |args: &[i32]| args.iter().sum());
/// table.set("offset", bind(100, |base: &i32, args: &[i32]| base + args[0]));
///
/// assert!(table.has(&"sum"));
/// assert_eq!(table.apply(&"sum", &[1, 2, 3]), Ok(6));
/// assert_eq!(table.apply(&"offset", &[7]), Ok(107));
/// assert!(table.apply(&"missing", &[]).is_err());
/// ```
pub struct CallbackTable<'f, K, A, R = ()> {
    callbacks: HashMap<K, Callback<'f, A, R>>,
}

impl<'f, K: Eq + Hash, A, R> CallbackTable<'f, K, A, R> {
    pub fn new() -> Self {
        Self {
            callbacks: HashMap::new(),
        }
    }

    /// Record `callback` under `key`, replacing any previous one.
    pub fn set<F>(&mut self, key: K, callback: F)
    where
        F: Fn(&[A]) -> R + 'f,
    {
        self.callbacks.insert(key, Box::new(callback));
    }

    /// Check whether a callback is recorded under `key`.
    pub fn has(&self, key: &K) -> bool {
        self.callbacks.contains_key(key)
    }

    /// Invoke the callback recorded under `key` with `args`.
    pub fn apply(&self, key: &K, args: &[A]) -> Result<R, CallbackError> {
        let callback = self
            .callbacks
            .get(key)
            .ok_or(CallbackError::UnknownCallback)?;

        Ok(callback(args))
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<K: Eq + Hash, A, R> Default for CallbackTable<'_, K, A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, A, R> fmt::Debug for CallbackTable<'_, K, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTable")
            .field("keys", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Bind a calling context to a callback.
///
/// The returned closure owns `context` and hands a reference to it to `f`
/// on every call, ahead of the argument slice.
pub fn bind<C, A, R, F>(context: C, f: F) -> impl Fn(&[A]) -> R
where
    F: Fn(&C, &[A]) -> R,
{
    move |args| f(&context, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    #[test]
    fn apply_invokes_callback_with_stored_context() {
        let key = Uuid::new_v4();
        let context = Rc::new(RefCell::new(Vec::new()));
        let mut table: CallbackTable<Uuid, i32> = CallbackTable::new();

        table.set(
            key,
            bind(Rc::clone(&context), |seen: &Rc<RefCell<Vec<&str>>>, _| {
                seen.borrow_mut().push("called");
            }),
        );
        table.apply(&key, &[]).unwrap();

        assert_eq!(*context.borrow(), vec!["called"]);
    }

    #[test]
    fn apply_invokes_callback_with_passed_arguments() {
        let key = Uuid::new_v4();
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut table = CallbackTable::new();

        let sink = Rc::clone(&received);
        table.set(key, move |args: &[i32]| sink.borrow_mut().extend_from_slice(args));
        table.apply(&key, &[1, 2, 3]).unwrap();

        assert_eq!(*received.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn apply_returns_callback_result() {
        let mut table: CallbackTable<&str, u8, String> = CallbackTable::new();
        table.set("len", |args: &[u8]| format!("{} args", args.len()));

        assert_eq!(table.apply(&"len", &[]).unwrap(), "0 args");
        assert_eq!(table.apply(&"len", &[4, 5]).unwrap(), "2 args");
    }

    #[test]
    fn apply_fails_for_unknown_key() {
        let table: CallbackTable<Uuid, ()> = CallbackTable::new();

        let err = table.apply(&Uuid::new_v4(), &[]).unwrap_err();

        assert_eq!(err, CallbackError::UnknownCallback);
        assert_eq!(err.to_string(), "Cannot invoke unknown callback");
    }

    #[test]
    fn has_indicates_whether_callback_exists() {
        let key = Uuid::new_v4();
        let mut table: CallbackTable<Uuid, ()> = CallbackTable::new();

        assert!(!table.has(&key));

        table.set(key, |_| {});

        assert!(table.has(&key));
        assert!(!table.has(&Uuid::new_v4()));
    }

    #[test]
    fn set_overwrites_existing_key() {
        let mut table: CallbackTable<&str, (), &str> = CallbackTable::new();
        table.set("branch", |_| "first");
        table.set("branch", |_| "second");

        assert_eq!(table.len(), 1);
        assert_eq!(table.apply(&"branch", &[]), Ok("second"));
    }

    #[test]
    fn callbacks_may_borrow_locals() {
        let prefix = String::from("state:");
        let mut table: CallbackTable<u8, &str, String> = CallbackTable::new();
        table.set(1, |args: &[&str]| format!("{}{}", prefix, args[0]));

        assert_eq!(table.apply(&1, &["open"]).unwrap(), "state:open");
    }
}
