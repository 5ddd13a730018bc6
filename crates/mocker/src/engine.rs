//! Execution engine
//!
//! A terminal call mints one instance from the tip's provider and walks the
//! chain from the root to the tip, applying each node's stub, side effect
//! and verification in that order. The instance is a local of the pass and
//! is threaded through as a parameter, so no node ever holds it and two
//! terminal calls never share one.

use crate::chain::Mocker;
use crate::multiplicity::Multiplicity;
use crate::provider::MockProvider;

/// Result of executing a chain
#[derive(Debug)]
pub enum Mocked<I, V> {
    /// No node verified; the configured instance
    Instance(I),
    /// Verification handles in root-to-tip order, never empty
    Verified(Vec<V>),
}

impl<I, V> Mocked<I, V> {
    /// Whether any node of the chain verified
    #[inline]
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    /// The instance, when no node verified
    #[must_use]
    pub fn instance(&self) -> Option<&I> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Verified(_) => None,
        }
    }

    /// Take the instance, when no node verified
    #[must_use]
    pub fn into_instance(self) -> Option<I> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Verified(_) => None,
        }
    }

    /// Verification handles, empty when no node verified
    #[must_use]
    pub fn verifications(&self) -> &[V] {
        match self {
            Self::Instance(_) => &[],
            Self::Verified(handles) => handles,
        }
    }

    /// Take the verification handles, empty when no node verified
    #[must_use]
    pub fn into_verifications(self) -> Vec<V> {
        match self {
            Self::Instance(_) => Vec::new(),
            Self::Verified(handles) => handles,
        }
    }
}

/// Outcome type of a chain over provider `P`
pub type MockedBy<P> = Mocked<<P as MockProvider>::Instance, <P as MockProvider>::Verification>;

/// Whether a pass runs verification rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Full,
    ConfigureOnly,
}

impl<P: MockProvider> Mocker<P> {
    /// Execute the chain at index 0
    #[must_use]
    pub fn mock(&self) -> MockedBy<P> {
        self.mock_at(0)
    }

    /// Execute the chain against a fresh instance at invocation `index`
    ///
    /// A panic raised by any selector, value supplier or procedure unwinds
    /// through this call unchanged.
    #[must_use]
    pub fn mock_at(&self, index: usize) -> MockedBy<P> {
        let mut instance = self.provider.create_instance();
        let verifications = self.run_pass(&mut instance, index, Pass::Full);
        tracing::debug!(
            index,
            depth = self.depth(),
            verifications = verifications.len(),
            "mock pass complete"
        );
        if verifications.is_empty() {
            Mocked::Instance(instance)
        } else {
            Mocked::Verified(verifications)
        }
    }

    /// Configure a fresh instance, run `procedure`, verify it was never called
    ///
    /// The chain's stubs and side effects apply; its own verify rules do not.
    pub fn verify_never<F>(&self, procedure: F) -> P::Verification
    where
        F: FnOnce(&mut P::Instance),
    {
        self.verify_once(procedure, Multiplicity::Never)
    }

    /// Configure a fresh instance, run `procedure`, verify exactly `n` calls
    ///
    /// The chain's stubs and side effects apply; its own verify rules do not.
    pub fn verify_times<F>(&self, procedure: F, n: usize) -> P::Verification
    where
        F: FnOnce(&mut P::Instance),
    {
        self.verify_once(procedure, Multiplicity::Times(n))
    }

    fn verify_once<F>(&self, procedure: F, multiplicity: Multiplicity) -> P::Verification
    where
        F: FnOnce(&mut P::Instance),
    {
        let mut instance = self.provider.create_instance();
        self.run_pass(&mut instance, 0, Pass::ConfigureOnly);
        procedure(&mut instance);
        tracing::debug!(%multiplicity, "one-shot verification");
        self.provider.verify_invocation(&instance, multiplicity)
    }

    /// Apply every node's rules, root first, to `instance`
    fn run_pass(&self, instance: &mut P::Instance, index: usize, pass: Pass) -> Vec<P::Verification> {
        let provider = &*self.provider;
        let mut nodes: Vec<&Self> = self.ancestry().collect();
        nodes.reverse();

        let mut verifications = Vec::new();
        for node in nodes {
            node.apply_stub(provider, instance, index);
            if let Some(effect) = &node.side_effect {
                tracing::trace!(index, "applying side effect");
                effect.call(instance, index);
            }
            if pass == Pass::Full {
                if let Some(handle) = node.apply_verification(provider, instance, index) {
                    verifications.push(handle);
                }
            }
        }
        verifications
    }

    fn apply_stub(&self, provider: &P, instance: &mut P::Instance, index: usize) {
        match (&self.selector, &self.value) {
            (Some(selector), Some(value)) => {
                tracing::trace!(
                    index,
                    indexed_selector = selector.is_indexed(),
                    indexed_value = value.is_indexed(),
                    "registering stub"
                );
                let selection = selector.call(instance, index);
                let returned = value.call(instance, index);
                provider.register_stub(instance, selection, returned);
            }
            (Some(_), None) => {
                tracing::warn!(index, "stub selector has no return value; skipped");
            }
            (None, _) => {}
        }
    }

    fn apply_verification(
        &self,
        provider: &P,
        instance: &mut P::Instance,
        index: usize,
    ) -> Option<P::Verification> {
        let procedure = self.verification.as_ref()?;
        procedure.call(instance, index);
        let multiplicity = self.multiplicity.unwrap_or(self.config.default_multiplicity);
        tracing::trace!(index, %multiplicity, "verifying instance");
        Some(provider.verify_invocation(instance, multiplicity))
    }
}
