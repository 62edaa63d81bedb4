//! Bounded FIFO of frame-time samples for rolling averages

use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("mean requested on an empty window")]
    InsufficientData,

    #[error("window capacity must be at least 1")]
    ZeroCapacity,
}

/// Holds at most `capacity` samples; pushing onto a full window evicts the
/// oldest one.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn push(&mut self, sample: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Plain arithmetic mean of the held samples.
    pub fn mean(&self) -> Result<f64, WindowError> {
        if self.samples.is_empty() {
            return Err(WindowError::InsufficientData);
        }

        let sum: f64 = self.samples.iter().sum();
        Ok(sum / self.samples.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_window() {
        let mut window = SlidingWindow::new(3).unwrap();

        window.push(10.0);
        assert_eq!(window.mean(), Ok(10.0));

        window.push(20.0);
        assert_eq!(window.mean(), Ok(15.0));

        window.push(30.0);
        assert_eq!(window.mean(), Ok(20.0));
        assert!(window.is_full());

        // Oldest sample falls out
        window.push(40.0);
        assert_eq!(window.mean(), Ok(30.0)); // (20 + 30 + 40) / 3
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn empty_window_has_no_mean() {
        let window = SlidingWindow::new(60).unwrap();
        assert_eq!(window.mean(), Err(WindowError::InsufficientData));
        assert!(!window.is_full());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(SlidingWindow::new(0).unwrap_err(), WindowError::ZeroCapacity);
    }

    #[test]
    fn length_and_mean_track_the_last_n_pushes() {
        let mut window = SlidingWindow::new(60).unwrap();
        let values: Vec<f64> = (0..150).map(|i| ((i * 37) % 23) as f64 * 0.5).collect();

        for (k, &value) in values.iter().enumerate() {
            window.push(value);
            let pushed = k + 1;
            let held = pushed.min(60);
            assert_eq!(window.len(), held);

            let tail = &values[pushed - held..pushed];
            let expected = tail.iter().sum::<f64>() / held as f64;
            assert!((window.mean().unwrap() - expected).abs() < 1e-9);
        }
    }
}
