use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to open device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("buffer of {bytes} bytes exceeds the device limit of {limit} bytes")]
    BufferTooLarge { bytes: u64, limit: u64 },

    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
