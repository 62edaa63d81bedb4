//! Redline Render
//!
//! wgpu implementation of the probe's `Scene`: a lit unit cube as the
//! baseline object plus the current test point cloud, under an orbiting
//! camera.

pub mod backend;
pub mod error;
pub mod gpu_scene;
pub mod window;

pub use error::RenderError;
pub use gpu_scene::WgpuScene;
pub use wgpu;
pub use winit;

/// Rendering backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Metal (macOS, iOS)
    Metal,
    /// DirectX 12 (Windows)
    DirectX12,
    /// Vulkan (cross-platform)
    Vulkan,
    /// OpenGL (cross-platform, fallback)
    OpenGL,
    /// WebGPU (web)
    WebGpu,
    /// No-op backend
    Empty,
}

/// Capability probe result
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    pub backend: BackendType,
    pub adapter_name: String,
    pub max_texture_size: u32,
    pub max_buffer_size: u64,
    pub supports_compute: bool,
}
