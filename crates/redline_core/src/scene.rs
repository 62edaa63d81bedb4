//! Renderer collaborator seen by the probe

use crate::workload::Workload;

/// The narrow surface the probe needs from a renderer.
///
/// `render_frame` must be synchronous from the caller's point of view: its
/// wall-clock cost is exactly what the probe measures.
pub trait Scene {
    type Error: std::error::Error + 'static;

    fn render_frame(&mut self) -> Result<(), Self::Error>;

    fn add_to_scene(&mut self, workload: &Workload) -> Result<(), Self::Error>;

    fn remove_from_scene(&mut self, workload: &Workload);
}
