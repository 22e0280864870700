//! Fixed-capacity FIFO history used for charting one telemetry channel.

use std::collections::VecDeque;

/// Samples retained per channel unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded history: `push` appends at the tail and, once the buffer is over
/// capacity, evicts exactly one element from the head.
///
/// There is no other removal or indexed mutation; readers get the samples
/// oldest -> newest through [`iter`](Self::iter) or [`to_vec`](Self::to_vec).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> SampleRingBuffer<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        self.buf.push_back(item);
        if self.buf.len() > self.capacity {
            self.buf.pop_front();
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Iterate samples oldest -> newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }
}

impl<T: Clone> SampleRingBuffer<T> {
    /// Snapshot of the history, oldest -> newest.
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

impl<T> Default for SampleRingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
