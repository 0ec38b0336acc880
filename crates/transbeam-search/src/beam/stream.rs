//! Child streams produced by expansion.

use std::fmt;

use crossbeam::channel::{IntoIter, Receiver};

use crate::candidate::ScoredConfiguration;

/// The children of one expanded candidate, in enumeration order.
///
/// Backed by a bounded channel sized to the estimated branching
/// factor: the producing worker blocks once the buffer is full and
/// unconsumed. The stream ends when the producer has enumerated every
/// legal transition.
///
/// Dropping a stream without draining it stops its producer at the next
/// send. The driver drains every stream it creates, so within a search
/// each expansion enumerates all legal transitions.
pub struct ChildStream<C> {
    receiver: Receiver<ScoredConfiguration<C>>,
}

impl<C> ChildStream<C> {
    pub(crate) fn new(receiver: Receiver<ScoredConfiguration<C>>) -> Self {
        Self { receiver }
    }

    /// Returns the buffer capacity of the stream.
    pub fn buffer_capacity(&self) -> Option<usize> {
        self.receiver.capacity()
    }
}

impl<C> IntoIterator for ChildStream<C> {
    type Item = ScoredConfiguration<C>;
    type IntoIter = IntoIter<ScoredConfiguration<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.receiver.into_iter()
    }
}

impl<C> fmt::Debug for ChildStream<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildStream")
            .field("buffered", &self.receiver.len())
            .field("capacity", &self.receiver.capacity())
            .finish()
    }
}
