//! Rule slots
//!
//! A chain node holds one slot per rule category. Each occupied slot is
//! either a plain closure over the instance or an indexed closure that also
//! receives the invocation index, never both.

use std::fmt;

/// Closure over the instance
pub(crate) type PlainFn<I, R> = Box<dyn Fn(&mut I) -> R>;

/// Closure over the instance and the invocation index
pub(crate) type IndexedFn<I, R> = Box<dyn Fn(&mut I, usize) -> R>;

/// An occupied rule slot
pub(crate) enum Rule<I, R> {
    /// Ignores the invocation index
    Plain(PlainFn<I, R>),
    /// Receives the invocation index
    Indexed(IndexedFn<I, R>),
}

impl<I, R> Rule<I, R> {
    pub(crate) fn plain(f: impl Fn(&mut I) -> R + 'static) -> Self {
        Self::Plain(Box::new(f))
    }

    pub(crate) fn indexed(f: impl Fn(&mut I, usize) -> R + 'static) -> Self {
        Self::Indexed(Box::new(f))
    }

    /// Resolve against `instance`, passing `index` only to indexed rules
    #[inline]
    pub(crate) fn call(&self, instance: &mut I, index: usize) -> R {
        match self {
            Self::Plain(f) => f(instance),
            Self::Indexed(f) => f(instance, index),
        }
    }

    pub(crate) fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }
}

impl<I, R> fmt::Debug for Rule<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_indexed() { "Indexed" } else { "Plain" })
    }
}

/// Rule categories, one slot each per chain node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Stub selector (`when`)
    Selector,
    /// Stub return value (`then_return`)
    Value,
    /// Side effect (`then`)
    SideEffect,
    /// Verification procedure (`verify`)
    Verification,
}

impl SlotKind {
    /// Name of the setter that fills this slot
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selector => "when",
            Self::Value => "then_return",
            Self::SideEffect => "then",
            Self::Verification => "verify",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rule_ignores_index() {
        let rule: Rule<i32, i32> = Rule::plain(|x| *x + 1);
        let mut value = 1;
        assert_eq!(rule.call(&mut value, 7), 2);
        assert!(!rule.is_indexed());
    }

    #[test]
    fn indexed_rule_receives_index() {
        let rule: Rule<i32, usize> = Rule::indexed(|_, i| i * 10);
        let mut value = 0;
        assert_eq!(rule.call(&mut value, 3), 30);
        assert_eq!(format!("{rule:?}"), "Indexed");
    }
}
