//! Chain nodes
//!
//! A [`Mocker`] is one frame of builder history. Fluent setters fill the
//! current node in place while the target slot is free. Once a slot of the
//! same category is already occupied the setter forks: the current node is
//! moved into a fresh child as its parent and the rule lands in the child,
//! which becomes the builder handed back to the caller.
//!
//! ```rust,ignore
//! let chain = Mocker::of(provider)
//!     .when(|g| { g.value(); })
//!     .then_return(|_| json!(1))?
//!     .when(|g| { g.label("a"); })   // selector slot taken: forks
//!     .then_return(|_| json!("x"))?;
//! assert_eq!(chain.depth(), 2);
//! ```

use crate::config::MockerConfig;
use crate::error::{MockerError, Result};
use crate::multiplicity::Multiplicity;
use crate::provider::MockProvider;
use crate::rule::{Rule, SlotKind};
use std::fmt;
use std::rc::Rc;

/// Fluent builder node for configuring doubles minted by `P`
pub struct Mocker<P: MockProvider> {
    pub(crate) provider: Rc<P>,
    pub(crate) config: MockerConfig,
    pub(crate) selector: Option<Rule<P::Instance, P::Selection>>,
    pub(crate) value: Option<Rule<P::Instance, P::Value>>,
    pub(crate) side_effect: Option<Rule<P::Instance, ()>>,
    pub(crate) verification: Option<Rule<P::Instance, ()>>,
    pub(crate) multiplicity: Option<Multiplicity>,
    pub(crate) parent: Option<Box<Mocker<P>>>,
    depth: usize,
}

impl<P: MockProvider> Mocker<P> {
    /// Create a root node for the type minted by `provider`
    #[must_use]
    pub fn of(provider: P) -> Self {
        Self::with_config(provider, MockerConfig::default())
    }

    /// Create a root node with explicit configuration
    #[must_use]
    pub fn with_config(provider: P, config: MockerConfig) -> Self {
        Self::from_shared(Rc::new(provider), config)
    }

    /// Create a root node over a provider the caller keeps a handle to
    #[must_use]
    pub fn from_shared(provider: Rc<P>, config: MockerConfig) -> Self {
        Self {
            provider,
            config,
            selector: None,
            value: None,
            side_effect: None,
            verification: None,
            multiplicity: None,
            parent: None,
            depth: 1,
        }
    }

    /// Move `self` under a fresh, empty child node
    fn fork(self, reason: &'static str) -> Self {
        let depth = self.depth + 1;
        let child = Self {
            provider: Rc::clone(&self.provider),
            config: self.config,
            selector: None,
            value: None,
            side_effect: None,
            verification: None,
            multiplicity: None,
            parent: Some(Box::new(self)),
            depth,
        };
        tracing::debug!(reason, depth, "forked chain node");
        child
    }

    // ---- stub rules ----------------------------------------------------

    /// Select the invocation to stub
    #[must_use]
    pub fn when<F>(self, selector: F) -> Self
    where
        F: Fn(&mut P::Instance) -> P::Selection + 'static,
    {
        self.set_selector(Rule::plain(selector))
    }

    /// Select the invocation to stub, varying by invocation index
    #[must_use]
    pub fn when_indexed<F>(self, selector: F) -> Self
    where
        F: Fn(&mut P::Instance, usize) -> P::Selection + 'static,
    {
        self.set_selector(Rule::indexed(selector))
    }

    fn set_selector(mut self, rule: Rule<P::Instance, P::Selection>) -> Self {
        if self.selector.is_some() {
            return self.fork(SlotKind::Selector.as_str()).set_selector(rule);
        }
        self.selector = Some(rule);
        self
    }

    /// Supply the value the selected invocation returns
    ///
    /// # Errors
    /// [`MockerError::InvalidConfiguration`] if this node has no selector,
    /// including the fresh fork made when this node already has a value.
    pub fn then_return<F>(self, value: F) -> Result<Self>
    where
        F: Fn(&mut P::Instance) -> P::Value + 'static,
    {
        self.set_value(Rule::plain(value), "then_return")
    }

    /// Supply the returned value, varying by invocation index
    ///
    /// # Errors
    /// Same as [`Mocker::then_return`].
    pub fn then_return_indexed<F>(self, value: F) -> Result<Self>
    where
        F: Fn(&mut P::Instance, usize) -> P::Value + 'static,
    {
        self.set_value(Rule::indexed(value), "then_return_indexed")
    }

    fn set_value(mut self, rule: Rule<P::Instance, P::Value>, name: &'static str) -> Result<Self> {
        if self.value.is_some() {
            return self.fork(SlotKind::Value.as_str()).set_value(rule, name);
        }
        if self.selector.is_none() {
            return Err(MockerError::missing_precondition(name, SlotKind::Selector.as_str()));
        }
        self.value = Some(rule);
        Ok(self)
    }

    // ---- side effects --------------------------------------------------

    /// Run `effect` against the instance after stubbing
    #[must_use]
    pub fn then<F>(self, effect: F) -> Self
    where
        F: Fn(&mut P::Instance) + 'static,
    {
        self.set_side_effect(Rule::plain(effect))
    }

    /// Run `effect` against the instance and invocation index after stubbing
    #[must_use]
    pub fn then_indexed<F>(self, effect: F) -> Self
    where
        F: Fn(&mut P::Instance, usize) + 'static,
    {
        self.set_side_effect(Rule::indexed(effect))
    }

    fn set_side_effect(mut self, rule: Rule<P::Instance, ()>) -> Self {
        if self.side_effect.is_some() {
            return self.fork(SlotKind::SideEffect.as_str()).set_side_effect(rule);
        }
        self.side_effect = Some(rule);
        self
    }

    // ---- verification --------------------------------------------------

    /// Exercise the instance, then verify it against this node's multiplicity
    #[must_use]
    pub fn verify<F>(self, procedure: F) -> Self
    where
        F: Fn(&mut P::Instance) + 'static,
    {
        self.set_verification(Rule::plain(procedure))
    }

    /// Indexed variant of [`Mocker::verify`]
    #[must_use]
    pub fn verify_indexed<F>(self, procedure: F) -> Self
    where
        F: Fn(&mut P::Instance, usize) + 'static,
    {
        self.set_verification(Rule::indexed(procedure))
    }

    fn set_verification(mut self, rule: Rule<P::Instance, ()>) -> Self {
        if self.verification.is_some() {
            return self.fork(SlotKind::Verification.as_str()).set_verification(rule);
        }
        self.verification = Some(rule);
        self
    }

    // ---- multiplicity --------------------------------------------------
    //
    // These overwrite the current node and never fork.

    /// Expect exactly `n` calls
    #[must_use]
    pub fn times(self, n: usize) -> Self {
        self.with_multiplicity(Multiplicity::Times(n))
    }

    /// Expect `n` or more calls
    #[must_use]
    pub fn at_least(self, n: usize) -> Self {
        self.with_multiplicity(Multiplicity::AtLeast(n))
    }

    /// Expect at most `n` calls
    #[must_use]
    pub fn at_most(self, n: usize) -> Self {
        self.with_multiplicity(Multiplicity::AtMost(n))
    }

    /// Expect no calls
    #[must_use]
    pub fn never(self) -> Self {
        self.with_multiplicity(Multiplicity::Never)
    }

    /// Expect one or more calls
    #[must_use]
    pub fn at_least_once(self) -> Self {
        self.with_multiplicity(Multiplicity::AtLeastOnce)
    }

    /// Set the multiplicity of the current node
    #[must_use]
    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }

    // ---- navigation ----------------------------------------------------

    /// The node this one forked from
    ///
    /// `None` on a root. Chained calls such as `lift().and_then(Mocker::lift)`
    /// simply run out of parents instead of faulting.
    #[inline]
    #[must_use]
    pub fn lift(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// The parent node, or `self` on a root
    #[inline]
    #[must_use]
    pub fn safe_lift(&self) -> &Self {
        self.lift().unwrap_or(self)
    }

    /// Re-link this node on top of `other` and continue from a fresh node
    ///
    /// The receiver's previous parent is dropped. The returned builder is an
    /// empty node whose parent is the receiver, so executing it applies
    /// `other`'s rules first and the receiver's after.
    #[must_use]
    pub fn lift_onto(mut self, other: Mocker<P>) -> Self {
        self.depth = other.depth + 1;
        self.parent = Some(Box::new(other));
        self.fork("lift_onto")
    }

    // ---- introspection -------------------------------------------------

    /// Nodes from this one back to the root
    pub(crate) fn ancestry(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |node| node.parent.as_deref())
    }

    /// Number of nodes in the chain, this one included
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this node was forked from another
    #[inline]
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Multiplicity set on this node, if any
    #[inline]
    #[must_use]
    pub fn multiplicity(&self) -> Option<Multiplicity> {
        self.multiplicity
    }

    /// Whether the given slot is occupied on this node
    #[must_use]
    pub fn occupies(&self, slot: SlotKind) -> bool {
        match slot {
            SlotKind::Selector => self.selector.is_some(),
            SlotKind::Value => self.value.is_some(),
            SlotKind::SideEffect => self.side_effect.is_some(),
            SlotKind::Verification => self.verification.is_some(),
        }
    }

    /// Chain configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MockerConfig {
        &self.config
    }

    /// Provider minting this chain's instances
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: MockProvider> fmt::Debug for Mocker<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mocker")
            .field("selector", &self.selector)
            .field("value", &self.value)
            .field("side_effect", &self.side_effect)
            .field("verification", &self.verification)
            .field("multiplicity", &self.multiplicity)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Create a root node; same as [`Mocker::of`]
#[must_use]
pub fn mocker<P: MockProvider>(provider: P) -> Mocker<P> {
    Mocker::of(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TapeProvider;

    fn root() -> Mocker<TapeProvider> {
        Mocker::of(TapeProvider::default())
    }

    #[test]
    fn single_rules_mutate_in_place() {
        let chain = root()
            .when(|_| "value".into())
            .then_return(|_| 1)
            .unwrap()
            .then(|t| t.log("effect"))
            .verify(|t| t.log("verify"));

        assert_eq!(chain.depth(), 1);
        assert!(!chain.has_parent());
        for slot in [
            SlotKind::Selector,
            SlotKind::Value,
            SlotKind::SideEffect,
            SlotKind::Verification,
        ] {
            assert!(chain.occupies(slot), "{slot} should be set");
        }
    }

    #[test]
    fn second_selector_forks() {
        let chain = root()
            .when(|_| "a".into())
            .when_indexed(|_, i| format!("b{i}"));

        assert_eq!(chain.depth(), 2);
        assert!(chain.occupies(SlotKind::Selector));
        assert!(chain.selector.as_ref().is_some_and(Rule::is_indexed));
        let parent = chain.lift().unwrap();
        assert!(parent.selector.as_ref().is_some_and(|r| !r.is_indexed()));
    }

    #[test]
    fn then_return_without_when_fails() {
        let err = root().then_return(|_| 1).unwrap_err();
        assert_eq!(err, MockerError::missing_precondition("then_return", "when"));

        let err = root().then_return_indexed(|_, _| 1).unwrap_err();
        assert!(matches!(
            err,
            MockerError::InvalidConfiguration { rule: "then_return_indexed", .. }
        ));
    }

    #[test]
    fn second_value_forks_into_node_without_selector() {
        let result = root()
            .when(|_| "a".into())
            .then_return(|_| 1)
            .unwrap()
            .then_return(|_| 2);
        assert!(matches!(result, Err(MockerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn plain_and_indexed_side_effects_share_a_slot() {
        let chain = root().then(|_| {}).then_indexed(|_, _| {});
        assert_eq!(chain.depth(), 2);

        let chain = root().verify(|_| {}).verify_indexed(|_, _| {});
        assert_eq!(chain.depth(), 2);
    }

    #[test]
    fn multiplicity_overwrites_without_forking() {
        let chain = root().verify(|_| {}).times(2).at_most(4);
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.multiplicity(), Some(Multiplicity::AtMost(4)));

        assert_eq!(root().never().multiplicity(), Some(Multiplicity::Never));
        assert_eq!(root().at_least(3).multiplicity(), Some(Multiplicity::AtLeast(3)));
        assert_eq!(root().at_least_once().multiplicity(), Some(Multiplicity::AtLeastOnce));
    }

    #[test]
    fn lift_on_root() {
        let chain = root();
        assert!(chain.lift().is_none());
        assert!(std::ptr::eq(chain.safe_lift(), &chain));
    }

    #[test]
    fn lift_past_root_runs_out() {
        let chain = root().then(|_| {}).then(|_| {});
        let parent = chain.lift().unwrap();
        assert!(std::ptr::eq(parent.safe_lift(), parent));
        assert!(chain.lift().and_then(Mocker::lift).is_none());
    }

    #[test]
    fn lift_onto_relinks() {
        let other = root().then(|t| t.log("other"));
        let receiver = root().then(|t| t.log("first")).then(|t| t.log("second"));
        assert_eq!(receiver.depth(), 2);

        let chain = receiver.lift_onto(other);
        // fresh node -> receiver -> other; receiver's old parent is gone
        assert_eq!(chain.depth(), 3);
        assert!(!chain.occupies(SlotKind::SideEffect));
        let receiver = chain.lift().unwrap();
        assert!(receiver.occupies(SlotKind::SideEffect));
        assert!(receiver.lift().unwrap().lift().is_none());
    }

    #[test]
    fn depth_tracks_forks_and_relinks() {
        let other = root().then(|_| {}).then(|_| {}).then(|_| {});
        assert_eq!(other.depth(), 3);
        assert_eq!(other.depth(), other.ancestry().count());

        let chain = root().then(|_| {}).then(|_| {}).lift_onto(other);
        assert_eq!(chain.depth(), 5);
        assert_eq!(chain.depth(), chain.ancestry().count());
        assert_eq!(chain.lift().unwrap().depth(), 4);
    }

    #[test]
    fn forks_inherit_config() {
        let config = MockerConfig::new().with_default_multiplicity(Multiplicity::Times(1));
        let chain = Mocker::with_config(TapeProvider::default(), config)
            .then(|_| {})
            .then(|_| {});
        assert_eq!(chain.config(), &config);
        assert_eq!(chain.lift().unwrap().config(), &config);
    }

    #[test]
    fn mocker_alias_builds_root() {
        let chain = mocker(TapeProvider::default());
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.provider().minted(), 0);
    }
}
