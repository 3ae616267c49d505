use glam::Mat4;
use spincube_scene::Frame;

/// Renderer-agnostic interface. All cube renderers implement this trait.
///
/// A renderer turns one [`Frame`] into one draw of the cube. It never
/// advances the rotation; that belongs to the frame loop.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Draw one frame.
    fn draw(&mut self, frame: &Frame) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable line per frame. Used by the CLI `simulate`
/// command and for logging the frame loop without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn draw(&mut self, frame: &Frame) -> String {
        let t = frame.model_view.w_axis;
        format!(
            "draw {}x{} rotation={:.3} rad indices={} eye_offset=({:.1}, {:.1}, {:.1})",
            frame.width, frame.height, frame.rotation, frame.index_count, t.x, t.y, t.z
        )
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub rotation: f32,
    pub index_count: u32,
    pub projection: Mat4,
    pub model_view: Mat4,
}

/// Renderer that records every draw instead of issuing it.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    draws: Vec<DrawRecord>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }
}

impl Renderer for RecordingRenderer {
    type Output = ();

    fn draw(&mut self, frame: &Frame) {
        self.draws.push(DrawRecord {
            rotation: frame.rotation,
            index_count: frame.index_count,
            projection: frame.projection,
            model_view: frame.model_view,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spincube_scene::{RenderState, SpinCamera};

    #[test]
    fn debug_renderer_describes_the_draw() {
        let frame = RenderState::new(0.5).frame(&SpinCamera::default(), 800, 600);
        let output = DebugTextRenderer::new().draw(&frame);

        assert!(output.contains("800x600"));
        assert!(output.contains("rotation=0.500"));
        assert!(output.contains("indices=36"));
        assert!(output.contains("-6.0"));
    }

    #[test]
    fn recording_renderer_keeps_every_draw() {
        let cam = SpinCamera::default();
        let mut renderer = RecordingRenderer::new();
        renderer.draw(&RenderState::new(0.0).frame(&cam, 10, 10));
        renderer.draw(&RenderState::new(1.0).frame(&cam, 10, 10));

        let draws = renderer.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[1].rotation, 1.0);
        assert_eq!(draws[1].model_view, cam.model_view_matrix(1.0));
    }
}
