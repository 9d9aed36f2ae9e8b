use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("cube shader failed to compile or link: {0}")]
    Shader(String),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("window surface reports no usable texture format")]
    NoSurfaceFormat,
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("draw issued before geometry was uploaded")]
    MissingGeometry,
}
