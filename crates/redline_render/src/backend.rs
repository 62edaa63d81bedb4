//! Adapter capability probing
//!
//! Logged once at startup so a breaking point can be read against the
//! hardware and backend that produced it.

use crate::error::RenderError;
use crate::{BackendType, DeviceCapabilities};

pub fn backend_type(backend: wgpu::Backend) -> BackendType {
    match backend {
        wgpu::Backend::Metal => BackendType::Metal,
        wgpu::Backend::Dx12 => BackendType::DirectX12,
        wgpu::Backend::Vulkan => BackendType::Vulkan,
        wgpu::Backend::Gl => BackendType::OpenGL,
        wgpu::Backend::BrowserWebGpu => BackendType::WebGpu,
        wgpu::Backend::Empty => BackendType::Empty,
    }
}

/// Probe rendering capabilities of a selected adapter
pub fn probe_capabilities(adapter: &wgpu::Adapter) -> DeviceCapabilities {
    let info = adapter.get_info();
    let limits = adapter.limits();
    let downlevel = adapter.get_downlevel_capabilities();

    DeviceCapabilities {
        backend: backend_type(info.backend),
        adapter_name: info.name,
        max_texture_size: limits.max_texture_dimension_2d,
        max_buffer_size: limits.max_buffer_size,
        supports_compute: downlevel
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS),
    }
}

/// Rejects a buffer the device could not allocate.
pub fn check_buffer_size(bytes: u64, limit: u64) -> Result<(), RenderError> {
    if bytes > limit {
        return Err(RenderError::BufferTooLarge { bytes, limit });
    }
    Ok(())
}
