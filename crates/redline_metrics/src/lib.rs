//! Redline Metrics - Frame timing primitives for the capacity probe
//!
//! # Usage
//!
//! ```ignore
//! use redline_metrics::{FrameTimer, SlidingWindow};
//!
//! let timer = FrameTimer::new();
//! let mut window = SlidingWindow::new(60)?; // Track last 60 frames
//! let sample = timer.time(|| renderer.render_frame())?;
//! window.push(sample);
//! println!("avg: {:.2}ms", window.mean()?);
//! ```

mod clock;
mod frame_timer;
mod sliding_window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_timer::{FrameTimer, Sample};
pub use sliding_window::{SlidingWindow, WindowError};
