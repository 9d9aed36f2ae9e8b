use crate::backend::{FrameUniforms, GraphicsBackend};
use crate::cube::CubeVertex;
use crate::error::RendererError;
use crate::lighting::LightingUniforms;
use crate::pipeline::{create_depth_texture, CubePipeline};
use telemetry_math::Matrix4;
use tracing::info;
use wgpu::util::DeviceExt;

/// Maps OpenGL clip depth `[-1, 1]` onto wgpu's `[0, 1]`.
#[rustfmt::skip]
const GL_TO_WGPU_DEPTH: Matrix4 = Matrix4([
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

struct CubeGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

/// [`GraphicsBackend`] that draws into a window surface with wgpu.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: CubePipeline,
    frame_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    geometry: Option<CubeGeometry>,
    depth_view: wgpu::TextureView,
    frame_count: u64,
}

impl WgpuBackend {
    /// Create the device, configure `target` as the output surface and
    /// compile the cube pipeline.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        info!(name = adapter.get_info().name, "Using GPU");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("telemetry_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RendererError::NoSurfaceFormat)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipeline = CubePipeline::new(&device, format).await?;

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lighting_uniforms"),
            size: std::mem::size_of::<LightingUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group =
            pipeline.create_uniform_bind_group(&device, &frame_buffer, &lighting_buffer);

        let depth_view =
            create_depth_texture(&device, surface_config.width, surface_config.height);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            frame_buffer,
            lighting_buffer,
            uniform_bind_group,
            geometry: None,
            depth_view,
            frame_count: 0,
        })
    }

    /// Reconfigure the surface and depth texture (call on resize).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_texture(&self.device, width, height);
    }
}

impl GraphicsBackend for WgpuBackend {
    fn upload_geometry(
        &mut self,
        vertices: &[CubeVertex],
        indices: &[u16],
    ) -> Result<(), RendererError> {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("cube_vertex_buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("cube_index_buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.geometry = Some(CubeGeometry {
            vertex_buffer,
            index_buffer,
        });
        Ok(())
    }

    fn upload_lighting(&mut self, lighting: &LightingUniforms) -> Result<(), RendererError> {
        self.queue
            .write_buffer(&self.lighting_buffer, 0, bytemuck::bytes_of(lighting));
        Ok(())
    }

    fn upload_frame(&mut self, uniforms: &FrameUniforms) {
        let pv = GL_TO_WGPU_DEPTH * Matrix4(bytemuck::cast(uniforms.pv));
        let corrected = FrameUniforms {
            pv: pv.to_cols_array_2d(),
            ..*uniforms
        };
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&corrected));
    }

    fn draw_indexed(&mut self, index_count: u32) -> Result<(), RendererError> {
        let geometry = self.geometry.as_ref().ok_or(RendererError::MissingGeometry)?;

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Skip this frame; the next one draws into the fresh surface.
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cube_render"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame_count += 1;
        if self.frame_count % 300 == 0 {
            tracing::debug!(frames = self.frame_count, "Render heartbeat");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_correction_maps_gl_range_to_unit_range() {
        let near = GL_TO_WGPU_DEPTH.transform([0.0, 0.0, -1.0, 1.0]);
        let far = GL_TO_WGPU_DEPTH.transform([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(near[2], 0.0);
        assert_eq!(far[2], 1.0);
    }
}
