//! Redline Core
//!
//! The adaptive capacity probe:
//! - Workload generation (uniform point clouds on the unit sphere)
//! - The stepping controller that grows the workload until the frame budget breaks
//! - Report formatting and the exportable report log
//!
//! Rendering is consumed through the [`Scene`] trait and driven by the host
//! loop, one [`ProbeController::tick`] per frame.

pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod scene;
pub mod workload;

pub use config::{ConfigError, ProbeConfig};
pub use controller::{Phase, ProbeController, ProbeState};
pub use error::ProbeError;
pub use report::{Report, ReportLog};
pub use scene::Scene;
pub use workload::{GpuVertex, Workload, WorkloadGenerator, WorkloadId, WorkloadKind};

pub use glam;
pub use redline_metrics as metrics;

/// Probe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
