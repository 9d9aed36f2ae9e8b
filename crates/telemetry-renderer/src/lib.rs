pub mod backend;
pub mod camera;
pub mod cube;
pub mod error;
pub mod gpu;
pub mod lighting;
pub mod pipeline;
pub mod scene;

pub use backend::{FrameUniforms, GraphicsBackend};
pub use camera::Camera;
pub use error::RendererError;
pub use gpu::WgpuBackend;
pub use lighting::{BlinnPhong, Lighting, PointLight, DEFAULT_LIGHTS};
pub use scene::{OrientationSample, SceneRenderer};
