use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use spincube_render::{Renderer, Result};
use spincube_scene::{CubeMesh, Frame};
use wgpu::util::DeviceExt;

use crate::geometry::CubeBuffers;
use crate::gpu::allocate;
use crate::program::{COLOR_SLOT, POSITION_SLOT, ProgramLayout, ShaderProgram};
use crate::shaders::ShaderSources;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MatrixUniform {
    matrix: [[f32; 4]; 4],
}

impl From<Mat4> for MatrixUniform {
    fn from(m: Mat4) -> Self {
        Self {
            matrix: m.to_cols_array_2d(),
        }
    }
}

/// What one draw submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStats {
    pub rotation: f32,
    pub index_count: u32,
}

/// wgpu renderer for the cube: owns the linked program, the cube buffers,
/// the two matrix uniforms and a depth texture sized to the drawable.
pub struct WgpuCubeRenderer {
    program: ShaderProgram,
    buffers: CubeBuffers,
    projection_buffer: wgpu::Buffer,
    model_view_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl WgpuCubeRenderer {
    /// Compile and link the program, upload the cube, allocate uniforms.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sources: &ShaderSources,
    ) -> Result<Self> {
        let layout = ProgramLayout::default();
        let program = ShaderProgram::build(device, sources, layout, surface_format, DEPTH_FORMAT)?;
        let buffers = CubeBuffers::upload(device, &CubeMesh::new())?;

        let projection_buffer = allocate(device, "projection uniform", || {
            uniform_buffer(device, "projection_uniform")
        })?;
        let model_view_buffer = allocate(device, "model-view uniform", || {
            uniform_buffer(device, "model_view_uniform")
        })?;

        let uniform_bind_group = allocate(device, "uniform bind group", || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("cube_uniform_bind_group"),
                layout: program.uniform_layout(),
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: layout.projection_binding,
                        resource: projection_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: layout.model_view_binding,
                        resource: model_view_buffer.as_entire_binding(),
                    },
                ],
            })
        })?;

        let depth_texture = create_depth_texture(device, width, height)?;

        Ok(Self {
            program,
            buffers,
            projection_buffer,
            model_view_buffer,
            uniform_bind_group,
            depth_texture,
            depth_size: (width, height),
        })
    }

    /// Recreate the depth texture for a new drawable size. On failure the
    /// previous depth texture is kept.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> Result<()> {
        if self.depth_size != (width, height) {
            self.depth_texture = create_depth_texture(device, width, height)?;
            self.depth_size = (width, height);
        }
        Ok(())
    }

    /// Render one frame into `view`, which must be `frame.width` x `frame.height`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &Frame,
    ) -> DrawStats {
        let stats = DrawStats {
            rotation: frame.rotation,
            index_count: frame.index_count,
        };
        if let Err(e) = self.resize(device, frame.width, frame.height) {
            tracing::error!("frame skipped: {e}");
            return stats;
        }

        queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::bytes_of(&MatrixUniform::from(frame.projection)),
        );
        queue.write_buffer(
            &self.model_view_buffer,
            0,
            bytemuck::bytes_of(&MatrixUniform::from(frame.model_view)),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cube_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(self.program.pipeline());
            pass.set_vertex_buffer(POSITION_SLOT, self.buffers.position.slice(..));
            pass.set_vertex_buffer(COLOR_SLOT, self.buffers.color.slice(..));
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_index_buffer(self.buffers.index.slice(..), CubeBuffers::INDEX_FORMAT);
            pass.draw_indexed(0..frame.index_count, 0, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(rotation = frame.rotation, indices = frame.index_count, "cube drawn");
        stats
    }

    /// Bind this renderer to a device and target view so a frame loop can drive it.
    pub fn bind<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
    ) -> BoundRenderer<'a> {
        BoundRenderer {
            renderer: self,
            device,
            queue,
            view,
        }
    }
}

/// A [`WgpuCubeRenderer`] paired with the view it draws into.
pub struct BoundRenderer<'a> {
    renderer: &'a mut WgpuCubeRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
}

impl Renderer for BoundRenderer<'_> {
    type Output = DrawStats;

    fn draw(&mut self, frame: &Frame) -> DrawStats {
        self.renderer.render(self.device, self.queue, self.view, frame)
    }
}

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(&MatrixUniform::from(Mat4::IDENTITY)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> Result<wgpu::TextureView> {
    let texture = allocate(device, "depth texture", || {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    })?;
    Ok(texture.create_view(&Default::default()))
}
