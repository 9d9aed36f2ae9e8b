use crate::cube::{CubeVertex, CUBE_SCALE};
use crate::error::RendererError;
use crate::lighting::LightingUniforms;
use bytemuck::{Pod, Zeroable};
use telemetry_math::{Matrix4, Vector3};

/// Per-frame uniform block (group 0, binding 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub pv: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// xyz camera position, w unused.
    pub camera_pos: [f32; 4],
    /// xyz scale applied to the unit cube before `model`, w unused.
    pub cube_scale: [f32; 4],
}

impl FrameUniforms {
    pub fn new(pv: &Matrix4, model: &Matrix4, camera_pos: Vector3) -> Self {
        Self {
            pv: pv.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            camera_pos: [camera_pos[0], camera_pos[1], camera_pos[2], 1.0],
            cube_scale: [CUBE_SCALE[0], CUBE_SCALE[1], CUBE_SCALE[2], 0.0],
        }
    }
}

/// The draw-call surface the scene renderer talks to.
///
/// A backend rasterizes and lights whatever it is given; it holds no scene
/// knowledge of its own.
pub trait GraphicsBackend {
    /// Upload static geometry. Called once, before any draw.
    fn upload_geometry(
        &mut self,
        vertices: &[CubeVertex],
        indices: &[u16],
    ) -> Result<(), RendererError>;

    /// Upload the lighting parameters used by every subsequent draw.
    fn upload_lighting(&mut self, lighting: &LightingUniforms) -> Result<(), RendererError>;

    /// Replace the per-frame uniforms.
    fn upload_frame(&mut self, uniforms: &FrameUniforms);

    /// Draw the first `index_count` indices of the uploaded geometry.
    fn draw_indexed(&mut self, index_count: u32) -> Result<(), RendererError>;
}
