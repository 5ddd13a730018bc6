//! Testing utilities for the Mocker workspace
//!
//! A recording [`mocker::MockProvider`], a sample capability with its fake,
//! and shared setup helpers.

#![allow(missing_docs)]

mod double;
mod gauge;
mod recording;

pub use double::{Double, Invocation};
pub use gauge::{FakeGauge, Gauge};
pub use recording::{Recorded, RecordingProvider, Verification, VerificationFailure};

use mocker::Mocker;

/// Provider for [`FakeGauge`]
pub type GaugeProvider = RecordingProvider<FakeGauge>;

/// Root chain over [`FakeGauge`]
pub fn gauges() -> Mocker<GaugeProvider> {
    Mocker::of(GaugeProvider::new())
}

/// Install a test-writer tracing subscriber; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
