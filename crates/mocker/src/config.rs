//! Chain configuration
//!
//! Settings shared by every node of a chain. A root node takes a config at
//! construction and each fork inherits it unchanged.

use crate::multiplicity::Multiplicity;
use serde::{Deserialize, Serialize};

/// Mocker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MockerConfig {
    /// Verification policy for verify rules declared without a multiplicity
    pub default_multiplicity: Multiplicity,
}

impl MockerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default verification policy
    #[inline]
    #[must_use]
    pub fn with_default_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.default_multiplicity = multiplicity;
        self
    }
}
