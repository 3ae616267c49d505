use spincube_render::{RenderError, Result, SurfaceKind, SurfaceSpec};

use crate::gpu::allocate;

/// Texture-backed drawable for headless rendering.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    spec: SurfaceSpec,
}

impl OffscreenTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Allocate a color texture for an `offscreen:WxH` surface.
    pub fn new(device: &wgpu::Device, spec: SurfaceSpec) -> Result<Self> {
        let spec = spec.expect_kind(SurfaceKind::Offscreen)?;

        let texture = allocate(device, "offscreen texture", || {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("offscreen_target"),
                size: wgpu::Extent3d {
                    width: spec.width,
                    height: spec.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        })?;

        let view = texture.create_view(&Default::default());
        tracing::debug!(%spec, "offscreen target created");
        Ok(Self {
            texture,
            view,
            spec,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        Self::FORMAT
    }

    pub fn size(&self) -> (u32, u32) {
        self.spec.size()
    }

    /// Copy the target back to the CPU as tightly packed RGBA8 rows.
    pub fn read_rgba(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Vec<u8>> {
        let (width, height) = self.size();
        let unpadded_row = width * 4;
        let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offscreen_readback"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("offscreen_readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            self.texture.size(),
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|e| RenderError::resource("readback mapping", e))?
            .map_err(|e| RenderError::resource("readback mapping", e))?;

        let mut pixels = Vec::with_capacity((unpadded_row * height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks_exact(padded_row as usize) {
                pixels.extend_from_slice(&row[..unpadded_row as usize]);
            }
        }
        readback.unmap();
        Ok(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::test_context;

    #[test]
    fn rejects_window_surfaces() {
        let Some(ctx) = test_context() else { return };
        let err = OffscreenTarget::new(&ctx.device, SurfaceSpec::window(800, 600))
            .err()
            .expect("window spec must not create an offscreen target");
        assert!(matches!(err, RenderError::Lookup { .. }));
    }

    #[test]
    fn oversized_target_is_a_resource_error() {
        let Some(ctx) = test_context() else { return };
        let err = OffscreenTarget::new(&ctx.device, SurfaceSpec::offscreen(100_000, 100_000))
            .err()
            .expect("texture beyond the device limit must be rejected");
        match err {
            RenderError::ResourceCreation { resource, reason } => {
                assert_eq!(resource, "offscreen texture");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cleared_target_reads_back() {
        let Some(ctx) = test_context() else { return };
        let target = OffscreenTarget::new(&ctx.device, SurfaceSpec::offscreen(3, 2)).unwrap();
        let pixels = target.read_rgba(&ctx.device, &ctx.queue).unwrap();
        assert_eq!(pixels.len(), 3 * 2 * 4);
    }
}
