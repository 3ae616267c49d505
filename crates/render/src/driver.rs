use spincube_scene::{AnimationClock, FirstFrame, RenderState, SpinCamera};

use crate::renderer::Renderer;

/// Draw `state` and return the state `dt` seconds later, plus the renderer's output.
///
/// The frame is built from the rotation before the update.
pub fn advance<R: Renderer>(
    renderer: &mut R,
    state: RenderState,
    camera: &SpinCamera,
    size: (u32, u32),
    dt: f32,
) -> (RenderState, R::Output) {
    let frame = state.frame(camera, size.0, size.1);
    let output = renderer.draw(&frame);
    (state.advance(dt), output)
}

/// Owns the animation state between host callbacks.
///
/// The host calls [`FrameLoop::tick`] once per display refresh with its
/// timestamp; nothing here schedules callbacks on its own.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: RenderState,
    clock: AnimationClock,
    camera: SpinCamera,
}

impl FrameLoop {
    pub fn new(camera: SpinCamera, first_frame: FirstFrame) -> Self {
        Self {
            state: RenderState::default(),
            clock: AnimationClock::new(first_frame),
            camera,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Host callback entry: timestamp in milliseconds.
    pub fn tick<R: Renderer>(&mut self, now_ms: f64, size: (u32, u32), renderer: &mut R) -> R::Output {
        let tick = self.clock.tick(now_ms);
        self.step(tick.dt, size, renderer)
    }

    /// Draw the current state and advance it by `dt` seconds.
    pub fn step<R: Renderer>(&mut self, dt: f32, size: (u32, u32), renderer: &mut R) -> R::Output {
        let (next, output) = advance(renderer, self.state, &self.camera, size, dt);
        tracing::trace!(rotation = next.rotation, dt, "frame advanced");
        self.state = next;
        output
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(SpinCamera::default(), FirstFrame::default())
    }
}
