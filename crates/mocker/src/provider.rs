//! Mock provider boundary
//!
//! The chain never creates, stubs or verifies doubles itself. It decides
//! *when* and *in what order* those things happen and delegates the work to
//! a [`MockProvider`]. Any mocking engine that can mint an instance, bind a
//! return value to an observed invocation and count invocations satisfies
//! this trait.

use crate::multiplicity::Multiplicity;

/// Engine that creates, stubs and verifies doubles of one target type
///
/// The provider value stands in for the target type: a chain built from a
/// provider mints every instance through it, so all nodes of the chain
/// agree on the type being mocked.
pub trait MockProvider {
    /// The double handed to selectors, procedures and callers
    type Instance;

    /// What a stub selector reports about the invocation it observed
    type Selection;

    /// Value a stub returns when its invocation fires
    type Value;

    /// Handle returned from verification
    type Verification;

    /// Mint a fresh instance with no stubs and an empty invocation record
    fn create_instance(&self) -> Self::Instance;

    /// Make `selection` return `value` on `instance` from now on
    fn register_stub(
        &self,
        instance: &mut Self::Instance,
        selection: Self::Selection,
        value: Self::Value,
    );

    /// Check the invocations recorded on `instance` against `multiplicity`
    fn verify_invocation(
        &self,
        instance: &Self::Instance,
        multiplicity: Multiplicity,
    ) -> Self::Verification;
}

/// Create a bare instance without any chain configuration
#[inline]
pub fn mock<P: MockProvider>(provider: &P) -> P::Instance {
    provider.create_instance()
}
