//! Recording double
//!
//! A [`Double`] is the shared recorder behind a fake. Every call the fake
//! forwards through [`Double::invoke`] is appended to the invocation log and
//! answered from the stub table, newest stub first, falling back to the
//! return type's default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One observed call: method name plus JSON-encoded arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub method: String,
    pub args: Value,
}

impl Invocation {
    /// Arguments that fail to serialize are recorded as `null`
    pub fn new(method: impl Into<String>, args: impl Serialize) -> Self {
        Self {
            method: method.into(),
            args: serde_json::to_value(args).unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            Value::Null => write!(f, "{}()", self.method),
            args => write!(f, "{}({args})", self.method),
        }
    }
}

#[derive(Debug, Default)]
struct DoubleState {
    log: Vec<Invocation>,
    stubs: Vec<(Invocation, Value)>,
}

/// Shared invocation recorder and stub table
///
/// Clones share state, which is how a verification view observes the same
/// calls as the instance it was made from.
#[derive(Debug, Clone, Default)]
pub struct Double {
    state: Rc<RefCell<DoubleState>>,
}

impl Double {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call and answer it from the stub table
    ///
    /// # Panics
    /// If the stubbed value does not deserialize into `R`.
    pub fn invoke<R>(&self, method: &str, args: impl Serialize) -> R
    where
        R: DeserializeOwned + Default,
    {
        let invocation = Invocation::new(method, args);
        let mut state = self.state.borrow_mut();
        let stubbed = state
            .stubs
            .iter()
            .rev()
            .find(|(pattern, _)| *pattern == invocation)
            .map(|(_, value)| value.clone());
        state.log.push(invocation);
        drop(state);

        match stubbed {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
                panic!("stub for `{method}` returned {value}, which does not fit: {err}")
            }),
            None => R::default(),
        }
    }

    /// Bind `value` to `invocation`; later bindings win
    pub fn stub(&self, invocation: Invocation, value: Value) {
        self.state.borrow_mut().stubs.push((invocation, value));
    }

    /// Remove and return the most recent invocation
    pub fn take_last(&self) -> Option<Invocation> {
        self.state.borrow_mut().log.pop()
    }

    /// Cut the log back to `len` calls, returning the removed tail in order
    pub fn truncate_to(&self, len: usize) -> Vec<Invocation> {
        let mut state = self.state.borrow_mut();
        let len = len.min(state.log.len());
        state.log.split_off(len)
    }

    /// Number of recorded calls equal to `invocation`
    pub fn count(&self, invocation: &Invocation) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|seen| *seen == invocation)
            .count()
    }

    /// Number of recorded calls
    pub fn len(&self) -> usize {
        self.state.borrow().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the invocation log
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.borrow().log.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unstubbed_calls_return_default_and_are_logged() {
        let double = Double::new();
        let value: i64 = double.invoke("value", ());
        assert_eq!(value, 0);
        assert_eq!(double.invocations(), [Invocation::new("value", ())]);
    }

    #[test]
    fn newest_stub_wins_and_args_discriminate() {
        let double = Double::new();
        double.stub(Invocation::new("label", "a"), json!("first"));
        double.stub(Invocation::new("label", "a"), json!("second"));

        assert_eq!(double.invoke::<String>("label", "a"), "second");
        assert_eq!(double.invoke::<String>("label", "b"), "");
        assert_eq!(double.count(&Invocation::new("label", "a")), 1);
    }

    #[test]
    fn take_last_pops_the_log() {
        let double = Double::new();
        double.invoke::<()>("record", 5);
        assert_eq!(double.take_last(), Some(Invocation::new("record", 5)));
        assert!(double.is_empty());
        assert_eq!(double.take_last(), None);
    }

    #[test]
    fn truncate_to_returns_the_tail() {
        let double = Double::new();
        double.invoke::<()>("record", 1);
        double.invoke::<()>("record", 2);
        double.invoke::<()>("record", 3);

        let tail = double.truncate_to(1);
        assert_eq!(tail, [Invocation::new("record", 2), Invocation::new("record", 3)]);
        assert_eq!(double.invocations(), [Invocation::new("record", 1)]);
        assert!(double.truncate_to(5).is_empty());
    }

    #[test]
    fn clones_share_state() {
        let double = Double::new();
        let view = double.clone();
        double.invoke::<()>("record", 1);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn invocation_display() {
        assert_eq!(Invocation::new("value", ()).to_string(), "value()");
        assert_eq!(Invocation::new("label", "k").to_string(), "label(\"k\")");
    }
}
