use glam::{Mat4, Vec3};

/// Fixed camera looking down -Z at the spinning cube.
///
/// The cube is pushed `distance` units away from the eye and spun about
/// Z by the rotation angle, then about Y by `y_spin_ratio` times it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub y_spin_ratio: f32,
}

impl Default for SpinCamera {
    fn default() -> Self {
        Self {
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            distance: 6.0,
            y_spin_ratio: 0.7,
        }
    }
}

impl SpinCamera {
    /// Right-handed perspective with a [0, 1] depth range, matching wgpu clip space.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    /// `translate(0, 0, -distance) * rotate_z(angle) * rotate_y(ratio * angle)`.
    ///
    /// Order matters: the Y spin happens in the frame already rotated about Z.
    pub fn model_view_matrix(&self, angle: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_z(angle)
            * Mat4::from_rotation_y(angle * self.y_spin_ratio)
    }
}

/// Drawable width over height. A zero height counts as one pixel.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}
