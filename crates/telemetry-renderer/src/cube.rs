use bytemuck::{Pod, Zeroable};

/// Non-uniform scale the vertex shader applies to the unit cube, giving a
/// flat board shape. Uploaded with every frame.
pub const CUBE_SCALE: [f32; 3] = [0.8, 0.1, 1.0];

/// Vertex format for the cube mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl CubeVertex {
    const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // normal
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Axis-aligned cube with corners at ±1, four vertices per face so each face
/// carries its own outward normal.
#[rustfmt::skip]
pub const CUBE_VERTICES: [CubeVertex; 24] = [
    // Front
    CubeVertex::new([-1.0, -1.0,  1.0], [ 0.0,  0.0,  1.0]),
    CubeVertex::new([ 1.0, -1.0,  1.0], [ 0.0,  0.0,  1.0]),
    CubeVertex::new([ 1.0,  1.0,  1.0], [ 0.0,  0.0,  1.0]),
    CubeVertex::new([-1.0,  1.0,  1.0], [ 0.0,  0.0,  1.0]),
    // Back
    CubeVertex::new([-1.0, -1.0, -1.0], [ 0.0,  0.0, -1.0]),
    CubeVertex::new([-1.0,  1.0, -1.0], [ 0.0,  0.0, -1.0]),
    CubeVertex::new([ 1.0,  1.0, -1.0], [ 0.0,  0.0, -1.0]),
    CubeVertex::new([ 1.0, -1.0, -1.0], [ 0.0,  0.0, -1.0]),
    // Top
    CubeVertex::new([-1.0,  1.0, -1.0], [ 0.0,  1.0,  0.0]),
    CubeVertex::new([-1.0,  1.0,  1.0], [ 0.0,  1.0,  0.0]),
    CubeVertex::new([ 1.0,  1.0,  1.0], [ 0.0,  1.0,  0.0]),
    CubeVertex::new([ 1.0,  1.0, -1.0], [ 0.0,  1.0,  0.0]),
    // Bottom
    CubeVertex::new([-1.0, -1.0, -1.0], [ 0.0, -1.0,  0.0]),
    CubeVertex::new([ 1.0, -1.0, -1.0], [ 0.0, -1.0,  0.0]),
    CubeVertex::new([ 1.0, -1.0,  1.0], [ 0.0, -1.0,  0.0]),
    CubeVertex::new([-1.0, -1.0,  1.0], [ 0.0, -1.0,  0.0]),
    // Right
    CubeVertex::new([ 1.0, -1.0, -1.0], [ 1.0,  0.0,  0.0]),
    CubeVertex::new([ 1.0,  1.0, -1.0], [ 1.0,  0.0,  0.0]),
    CubeVertex::new([ 1.0,  1.0,  1.0], [ 1.0,  0.0,  0.0]),
    CubeVertex::new([ 1.0, -1.0,  1.0], [ 1.0,  0.0,  0.0]),
    // Left
    CubeVertex::new([-1.0, -1.0, -1.0], [-1.0,  0.0,  0.0]),
    CubeVertex::new([-1.0, -1.0,  1.0], [-1.0,  0.0,  0.0]),
    CubeVertex::new([-1.0,  1.0,  1.0], [-1.0,  0.0,  0.0]),
    CubeVertex::new([-1.0,  1.0, -1.0], [-1.0,  0.0,  0.0]),
];

/// Two counter-clockwise (seen from outside) triangles per face.
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0,  1,  2,  0,  2,  3,  // Front
    4,  5,  6,  4,  6,  7,  // Back
    8,  9,  10, 8,  10, 11, // Top
    12, 13, 14, 12, 14, 15, // Bottom
    16, 17, 18, 16, 18, 19, // Right
    20, 21, 22, 20, 22, 23, // Left
];
