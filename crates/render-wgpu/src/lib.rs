//! wgpu render backend for the spinning cube.
//!
//! Compiles and links the cube program, uploads the three cube buffers once,
//! and draws one indexed triangle list per frame.
//!
//! # Invariants
//! - Program and buffers exist before the first draw; construction fails otherwise.
//! - Buffers are never written after upload.
//! - The renderer never advances rotation state.

mod geometry;
mod gpu;
mod offscreen;
mod program;
mod renderer;
mod shaders;

pub use geometry::CubeBuffers;
pub use gpu::GpuContext;
pub use offscreen::OffscreenTarget;
pub use program::{ProgramLayout, ShaderProgram};
pub use renderer::{BoundRenderer, DEPTH_FORMAT, DrawStats, WgpuCubeRenderer};
pub use shaders::{FRAGMENT_SHADER, ShaderSources, VERTEX_SHADER};
