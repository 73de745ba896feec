//! Bounded latency history kept per monitor for sparkline rendering

use std::collections::VecDeque;

/// Fixed-capacity FIFO of latency samples in milliseconds.
///
/// A sample of `0` marks a failed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyHistory {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl LatencyHistory {
    /// Create an empty history holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when full
    pub fn record(&mut self, latency_ms: u64) {
        if self.capacity == 0 {
            return;
        }

        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }

        self.samples.push_back(latency_ms);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples in probe order, oldest first
    pub fn to_vec(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }
}
