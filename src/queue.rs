//! FIFO of mismatched faces waiting to be turned back over.
//!
//! Mismatched pairs stay visibly selected until the queue is drained, either
//! lazily on the next selection or immediately when too many faces are
//! revealed at once. Entries are pushed and drained two at a time, so the
//! queue length is always even.

use std::collections::VecDeque;

use crate::item::ItemId;

#[derive(Debug, Default)]
pub struct UnselectQueue {
    inner: VecDeque<ItemId>,
}

impl UnselectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mismatched pair, in call order.
    pub fn enqueue_pair(&mut self, first: ItemId, second: ItemId) {
        self.inner.push_back(first);
        self.inner.push_back(second);
    }

    /// Remove the two oldest entries.
    ///
    /// Draining an empty queue is an invariant violation; it asserts in debug
    /// builds and is a `None` no-op in release.
    pub fn drain_oldest_pair(&mut self) -> Option<(ItemId, ItemId)> {
        debug_assert!(
            self.inner.len() >= 2,
            "drain_oldest_pair on a queue holding {} entries",
            self.inner.len()
        );
        let first = self.inner.pop_front()?;
        let second = self.inner.pop_front()?;
        Some((first, second))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
