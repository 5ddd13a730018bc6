//! Mocker - fluent test-double configuration
//!
//! Declare stubs, side effects and verifications as a chain, then replay the
//! chain against freshly minted doubles. The doubles themselves come from a
//! pluggable [`MockProvider`]; this crate only decides when and in what order
//! the provider is called.
//!
//! # Core Concepts
//!
//! - [`Mocker`]: one chain node. Setters fill the node in place and fork a
//!   linked child when a slot of the same category is already taken.
//! - [`Mocker::mock_at`]: executes the chain root-to-tip against one fresh
//!   instance, yielding [`Mocked`].
//! - [`Mocker::as_list_of`]: executes the chain once per index.
//! - [`Multiplicity`]: call-count constraints for verification.
//!
//! # Example
//!
//! ```rust,ignore
//! use mocker::prelude::*;
//!
//! let gauges = Mocker::of(RecordingProvider::<FakeGauge>::new())
//!     .when(|g| { g.value(); })
//!     .then_return_indexed(|_, i| json!(i * 10))?
//!     .as_list_of(3);
//!
//! // values 0, 10, 20
//! ```

mod bulk;
mod chain;
mod config;
mod engine;
mod error;
mod multiplicity;
mod provider;
mod rule;

#[cfg(test)]
mod testing;

// Re-exports
pub use chain::{mocker, Mocker};
pub use config::MockerConfig;
pub use engine::{Mocked, MockedBy};
pub use error::{MockerError, Result};
pub use multiplicity::Multiplicity;
pub use provider::{mock, MockProvider};
pub use rule::SlotKind;

/// Common imports for building chains
pub mod prelude {
    pub use crate::{mock, mocker, MockProvider, Mocked, Mocker, MockerConfig, MockerError, Multiplicity};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
