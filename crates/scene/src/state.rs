use glam::Mat4;

use crate::camera::{SpinCamera, aspect_ratio};
use crate::mesh::CubeMesh;

/// Per-frame mutable state of the demo: the accumulated rotation angle.
///
/// Angles are radians and are advanced by elapsed seconds one-to-one.
/// There is no wraparound; precision degrades once the angle is large.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderState {
    pub rotation: f32,
}

impl RenderState {
    pub fn new(rotation: f32) -> Self {
        Self { rotation }
    }

    /// Returns the state after `dt` seconds.
    #[must_use]
    pub fn advance(self, dt: f32) -> Self {
        Self {
            rotation: self.rotation + dt,
        }
    }

    /// Everything the renderer needs to draw the current state into a
    /// `width` x `height` drawable.
    pub fn frame(&self, camera: &SpinCamera, width: u32, height: u32) -> Frame {
        Frame {
            projection: camera.projection_matrix(aspect_ratio(width, height)),
            model_view: camera.model_view_matrix(self.rotation),
            rotation: self.rotation,
            index_count: CubeMesh::INDEX_COUNT as u32,
            width,
            height,
        }
    }
}

/// Inputs for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub projection: Mat4,
    pub model_view: Mat4,
    /// Angle the matrices were built from.
    pub rotation: f32,
    pub index_count: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_adds_elapsed_time_exactly() {
        let theta = 2.5_f32;
        for dt in [0.0_f32, 0.016, 1.0, 123.456] {
            assert_eq!(RenderState::new(theta).advance(dt).rotation, theta + dt);
        }
    }

    #[test]
    fn advance_never_wraps() {
        let mut state = RenderState::default();
        for _ in 0..10 {
            state = state.advance(1.0);
        }
        assert_eq!(state.rotation, 10.0);
        assert!(state.rotation > std::f32::consts::TAU);
    }

    #[test]
    fn frame_uses_current_rotation() {
        let cam = SpinCamera::default();
        let state = RenderState::new(0.75);
        let frame = state.frame(&cam, 800, 600);

        assert_eq!(frame.rotation, 0.75);
        assert_eq!(frame.index_count, 36);
        assert_eq!(frame.model_view, cam.model_view_matrix(0.75));
        assert_eq!(frame.projection, cam.projection_matrix(800.0 / 600.0));
    }
}
