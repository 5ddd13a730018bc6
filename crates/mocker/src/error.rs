//! Error types for chain configuration
//!
//! Only configuration mistakes surface as errors. Faults raised by
//! caller-supplied selectors and procedures are panics and unwind through
//! the terminal operation untouched.

/// Errors raised while building a chain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockerError {
    /// A rule was declared before the rule it depends on
    #[error("invalid configuration: `{rule}` requires a preceding `{missing}` rule")]
    InvalidConfiguration {
        /// The rule being declared
        rule: &'static str,
        /// The precondition rule that is absent
        missing: &'static str,
    },
}

impl MockerError {
    /// Create a missing-precondition error
    #[must_use]
    pub fn missing_precondition(rule: &'static str, missing: &'static str) -> Self {
        Self::InvalidConfiguration { rule, missing }
    }
}

/// Result alias for chain-building operations
pub type Result<T> = std::result::Result<T, MockerError>;
