use crate::backend::{FrameUniforms, GraphicsBackend};
use crate::camera::Camera;
use crate::cube::{CUBE_INDICES, CUBE_VERTICES};
use crate::error::RendererError;
use crate::lighting::{Lighting, PointLight};
use serde::Deserialize;
use telemetry_math::Matrix4;

/// One reading from the orientation endpoint: `{ "rot": [x_deg, z_deg] }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct OrientationSample {
    /// Rotation about X and Z in degrees.
    pub rot: [f32; 2],
}

impl OrientationSample {
    pub fn model_matrix(&self) -> Matrix4 {
        Matrix4::rotation_x(self.rot[0].to_radians())
            * Matrix4::rotation_z((-self.rot[1]).to_radians())
    }
}

/// Draws the orientation cube through a [`GraphicsBackend`].
pub struct SceneRenderer<B> {
    backend: B,
}

impl<B: GraphicsBackend> SceneRenderer<B> {
    /// Upload the cube mesh and the parameters of `lighting` once.
    pub fn new(
        mut backend: B,
        lighting: &impl Lighting,
        lights: &[PointLight],
    ) -> Result<Self, RendererError> {
        backend.upload_geometry(&CUBE_VERTICES, &CUBE_INDICES)?;
        backend.upload_lighting(&lighting.uniforms(lights))?;
        Ok(Self { backend })
    }

    /// Draw one frame for `sample`.
    pub fn render(
        &mut self,
        sample: &OrientationSample,
        camera: &Camera,
        pv_matrix: &Matrix4,
    ) -> Result<(), RendererError> {
        let model = sample.model_matrix();
        self.backend
            .upload_frame(&FrameUniforms::new(pv_matrix, &model, camera.pos));
        self.backend.draw_indexed(CUBE_INDICES.len() as u32)
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
