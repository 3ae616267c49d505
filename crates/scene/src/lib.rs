//! Scene data for the spinning cube: everything that can be computed
//! without a GPU.
//!
//! # Invariants
//! - The mesh is fixed: 24 vertices, 36 indices, one color per face.
//! - Rotation state is a value; advancing it never clamps or wraps.
//! - The clock is driven by caller-supplied timestamps, never by a timer.

pub mod camera;
pub mod clock;
pub mod mesh;
pub mod state;

pub use camera::{SpinCamera, aspect_ratio};
pub use clock::{AnimationClock, FirstFrame, FrameTick};
pub use mesh::{CubeMesh, Face};
pub use state::{Frame, RenderState};
