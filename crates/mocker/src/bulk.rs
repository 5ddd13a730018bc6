//! Bulk generation of independently configured instances

use crate::chain::Mocker;
use crate::engine::MockedBy;
use crate::provider::MockProvider;

impl<P: MockProvider> Mocker<P> {
    /// One executed instance, as a list
    #[must_use]
    pub fn as_list(&self) -> Vec<MockedBy<P>> {
        self.as_list_of(1)
    }

    /// Execute the chain `n` times at indices `0..n`, in order
    ///
    /// `n == 0` is treated as 1. Every element has its own instance, and
    /// indexed rules see that element's position.
    #[must_use]
    pub fn as_list_of(&self, n: usize) -> Vec<MockedBy<P>> {
        let n = n.max(1);
        tracing::debug!(count = n, "generating mock list");
        (0..n).map(|index| self.mock_at(index)).collect()
    }
}
