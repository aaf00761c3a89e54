//! Rolling indicators that plug into the `ta` trait family.
//!
//! `SlidingWindow` implements `ta::Next`, `ta::Period` and `ta::Reset` so it
//! can be driven exactly like the upstream `ta` indicators. `SignalProcessor`
//! builds spike detection on top of it.

pub mod signal;

use std::collections::VecDeque;

use ta::{Next, Period, Reset};

use crate::utils::error::{Error, Result};

pub use signal::{detect_peaks, normalize, SignalConfig, SignalProcessor, SignalReading, SignalSnapshot};

/// Fixed-capacity FIFO of the most recent samples with an O(1) running mean.
///
/// Invariants: `sum` always equals the sum of the buffered samples and the
/// buffer never holds more than `capacity` values.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("sliding window capacity must be > 0".to_string()));
        }
        Ok(Self { capacity, values: VecDeque::with_capacity(capacity + 1), sum: 0.0 })
    }

    /// Push a sample, evicting the oldest one once the window is over capacity.
    pub fn add(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
    }

    /// Mean of the buffered samples; `0.0` for an empty window.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f64
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Buffered samples, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl Next<f64> for SlidingWindow {
    type Output = f64;

    fn next(&mut self, input: f64) -> f64 {
        self.add(input);
        self.average()
    }
}

impl Period for SlidingWindow {
    fn period(&self) -> usize {
        self.capacity
    }
}

impl Reset for SlidingWindow {
    fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}
