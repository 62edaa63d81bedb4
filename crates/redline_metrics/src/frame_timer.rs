//! Frame timing utilities

use super::clock::{Clock, SystemClock};

/// Frame time in milliseconds.
pub type Sample = f64;

/// Times a single render submission at a time.
pub struct FrameTimer<C: Clock = SystemClock> {
    clock: C,
}

impl FrameTimer<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for FrameTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Runs `render` exactly once and returns how long it took.
    ///
    /// A failing render is returned as-is.
    pub fn time<F, E>(&self, render: F) -> Result<Sample, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        let start = self.clock.now();
        render()?;
        let elapsed = self.clock.now().saturating_sub(start);

        Ok(elapsed.as_secs_f64() * 1000.0)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn measures_elapsed_render_time() {
        let clock = ManualClock::new();
        let timer = FrameTimer::with_clock(clock.clone());

        let sample = timer
            .time(|| {
                clock.advance_ms(12.5);
                Ok::<(), ()>(())
            })
            .unwrap();

        assert!((sample - 12.5).abs() < 1e-9);
    }

    #[test]
    fn render_runs_exactly_once() {
        let timer = FrameTimer::with_clock(ManualClock::new());
        let mut calls = 0;

        timer
            .time(|| {
                calls += 1;
                Ok::<(), ()>(())
            })
            .unwrap();

        assert_eq!(calls, 1);
    }

    #[test]
    fn render_error_propagates_unchanged() {
        let clock = ManualClock::new();
        let timer = FrameTimer::with_clock(clock.clone());

        let result = timer.time(|| {
            clock.advance_ms(3.0);
            Err("device lost")
        });

        assert_eq!(result, Err("device lost"));
        // The next frame is timed from its own start.
        let sample = timer.time(|| Ok::<(), &str>(())).unwrap();
        assert_eq!(sample, 0.0);
    }

    #[test]
    fn system_timer_is_non_negative() {
        let timer = FrameTimer::new();
        let sample = timer.time(|| Ok::<(), ()>(())).unwrap();
        assert!(sample >= 0.0);
    }
}
