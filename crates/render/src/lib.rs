//! Rendering Adapter: backend-agnostic interface for drawing the cube.
//!
//! # Invariants
//! - A renderer draws exactly what a [`Frame`](spincube_scene::Frame) describes
//!   and never touches rotation state.
//! - Rotation advances only after the frame has been drawn.
//!
//! The GPU backend lives in `spincube-render-wgpu`. The renderers here need
//! no device and back the CLI `simulate` command and the tests.

mod driver;
mod error;
mod renderer;
mod target;

pub use driver::{FrameLoop, advance};
pub use error::{RenderError, Result, ShaderStage};
pub use renderer::{DebugTextRenderer, DrawRecord, RecordingRenderer, Renderer};
pub use target::{SurfaceKind, SurfaceSpec};

pub fn crate_info() -> &'static str {
    concat!("spincube-render v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
