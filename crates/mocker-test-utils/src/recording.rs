//! Recording provider
//!
//! Stubbing follows the capture model: a selector calls a method on the
//! fake, and [`RecordingProvider::register_stub`] takes that call off the
//! log and binds the value to it. Value suppliers must therefore not call
//! the fake themselves.

use crate::double::{Double, Invocation};
use mocker::{MockProvider, Multiplicity};
use serde_json::Value;
use std::marker::PhantomData;

/// A fake whose calls are routed through a [`Double`]
pub trait Recorded {
    /// Build a fake over `double`
    fn from_double(double: Double) -> Self;

    /// The recorder behind this fake
    fn double(&self) -> &Double;
}

/// Provider minting recorded fakes of type `T`
#[derive(Debug)]
pub struct RecordingProvider<T> {
    _fake: PhantomData<fn() -> T>,
}

impl<T> RecordingProvider<T> {
    pub fn new() -> Self {
        Self { _fake: PhantomData }
    }
}

impl<T> Default for RecordingProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recorded> MockProvider for RecordingProvider<T> {
    type Instance = T;
    type Selection = ();
    type Value = Value;
    type Verification = Verification<T>;

    fn create_instance(&self) -> T {
        T::from_double(Double::new())
    }

    /// # Panics
    /// If the selector did not call the fake.
    fn register_stub(&self, instance: &mut T, _selection: (), value: Value) {
        let double = instance.double();
        let Some(invocation) = double.take_last() else {
            panic!("stub selector must call a method on the fake");
        };
        double.stub(invocation, value);
    }

    fn verify_invocation(&self, instance: &T, multiplicity: Multiplicity) -> Verification<T> {
        Verification {
            view: T::from_double(instance.double().clone()),
            multiplicity,
        }
    }
}

/// Reasons a verification check fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationFailure {
    /// The check closure made no call on the fake
    #[error("verification closure did not call the fake")]
    NoInvocation,

    /// Observed count outside the expected multiplicity
    #[error("expected {expected} to {invocation}, observed {actual}")]
    Mismatch {
        invocation: Invocation,
        expected: Multiplicity,
        actual: usize,
    },
}

/// Verification handle over a recorded fake
///
/// Name the invocation to count by calling it on the view passed to
/// [`Verification::check`]; calls made through the view are not counted.
#[derive(Debug)]
pub struct Verification<T> {
    view: T,
    multiplicity: Multiplicity,
}

impl<T: Recorded> Verification<T> {
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Count calls matching the first one `select` makes
    ///
    /// Every call `select` makes is removed from the log again, so checks
    /// never change later counts.
    ///
    /// # Errors
    /// [`VerificationFailure`] when `select` makes no call or the count is
    /// outside the multiplicity.
    pub fn check<R>(&self, select: impl FnOnce(&T) -> R) -> Result<usize, VerificationFailure> {
        let double = self.view.double();
        let before = double.len();
        let _ = select(&self.view);
        let invocation = double
            .truncate_to(before)
            .into_iter()
            .next()
            .ok_or(VerificationFailure::NoInvocation)?;

        let actual = double.count(&invocation);
        if self.multiplicity.admits(actual) {
            Ok(actual)
        } else {
            Err(VerificationFailure::Mismatch {
                invocation,
                expected: self.multiplicity,
                actual,
            })
        }
    }

    /// [`Verification::check`], panicking on failure
    ///
    /// # Panics
    /// When the check fails.
    pub fn assert<R>(&self, select: impl FnOnce(&T) -> R) -> usize {
        self.check(select).unwrap_or_else(|failure| panic!("{failure}"))
    }
}
