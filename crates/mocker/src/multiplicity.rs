//! Call-count constraints for verification rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected number of matching invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Multiplicity {
    /// Exactly `n` calls
    Times(usize),
    /// `n` or more calls
    AtLeast(usize),
    /// At most `n` calls
    AtMost(usize),
    /// No calls at all
    Never,
    /// One or more calls
    #[default]
    AtLeastOnce,
}

impl Multiplicity {
    /// Whether an observed call count satisfies this constraint
    #[inline]
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        match *self {
            Self::Times(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::AtMost(n) => count <= n,
            Self::Never => count == 0,
            Self::AtLeastOnce => count >= 1,
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Times(1) => write!(f, "exactly 1 call"),
            Self::Times(n) => write!(f, "exactly {n} calls"),
            Self::AtLeast(n) => write!(f, "at least {n} calls"),
            Self::AtMost(n) => write!(f, "at most {n} calls"),
            Self::Never => write!(f, "no calls"),
            Self::AtLeastOnce => write!(f, "at least 1 call"),
        }
    }
}
