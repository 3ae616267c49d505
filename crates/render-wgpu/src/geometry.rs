use spincube_render::{RenderError, Result};
use spincube_scene::CubeMesh;
use wgpu::util::DeviceExt;

use crate::gpu::scoped;

/// The cube's GPU-resident streams. Written once at creation, never updated.
pub struct CubeBuffers {
    pub position: wgpu::Buffer,
    pub color: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}

impl CubeBuffers {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

    /// Upload `mesh` into three static buffers.
    pub fn upload(device: &wgpu::Device, mesh: &CubeMesh) -> Result<Self> {
        let (buffers, error) = scoped(device, wgpu::ErrorFilter::OutOfMemory, || {
            let position = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("cube_position_buffer"),
                contents: bytemuck::cast_slice(&mesh.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let color = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("cube_color_buffer"),
                contents: bytemuck::cast_slice(&mesh.colors),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("cube_index_buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            Self {
                position,
                color,
                index,
                index_count: mesh.index_count(),
            }
        });

        if let Some(reason) = error {
            return Err(RenderError::resource("cube buffers", reason));
        }

        tracing::debug!(
            vertices = mesh.positions.len(),
            indices = buffers.index_count,
            "cube buffers uploaded"
        );
        Ok(buffers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::test_context;

    #[test]
    fn uploads_three_sized_buffers() {
        let Some(ctx) = test_context() else { return };
        let buffers = CubeBuffers::upload(&ctx.device, &CubeMesh::new()).unwrap();

        assert_eq!(buffers.position.size(), 24 * 3 * 4);
        assert_eq!(buffers.color.size(), 24 * 4 * 4);
        assert_eq!(buffers.index.size(), 36 * 2);
        assert_eq!(buffers.index_count, 36);
        assert!(!buffers.index.usage().contains(wgpu::BufferUsages::COPY_DST));
        assert!(buffers.position.usage().contains(wgpu::BufferUsages::VERTEX));
    }
}
