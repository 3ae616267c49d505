use anyhow::{Context, Result};
use clap::Parser;
use spincube_render::{FrameLoop, RenderError, SurfaceKind, SurfaceSpec};
use spincube_render_wgpu::{GpuContext, ShaderSources, WgpuCubeRenderer};
use spincube_scene::{FirstFrame, SpinCamera};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "spincube-desktop", about = "Render a spinning cube in a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Drawable surface: `window` or `window:WIDTHxHEIGHT`
    #[arg(long, default_value = "window:800x600")]
    surface: String,

    /// Window title
    #[arg(long, default_value = "spincube")]
    title: String,

    /// Replace the built-in vertex shader with this WGSL file
    #[arg(long)]
    vertex_shader: Option<PathBuf>,

    /// Replace the built-in fragment shader with this WGSL file
    #[arg(long)]
    fragment_shader: Option<PathBuf>,

    /// Count the first frame's elapsed time from the clock origin instead of zero
    #[arg(long)]
    legacy_first_frame: bool,
}

/// GPU objects bound to the window. Created on `resumed`, dropped on exit.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    context: GpuContext,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuCubeRenderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        title: &str,
        spec: SurfaceSpec,
        sources: &ShaderSources,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(spec.width, spec.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| RenderError::resource("window", e))?,
        );

        let instance = GpuContext::create_instance();
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::resource("surface", e))?;

        let context = pollster::block_on(GpuContext::request(&instance, Some(&surface)))?;

        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(RenderError::lookup(spec.to_string(), "window has zero size").into());
        }

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| {
                RenderError::lookup(spec.to_string(), "surface supports no texture formats")
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);
        tracing::info!(?format, width = size.width, height = size.height, "surface configured");

        let renderer =
            WgpuCubeRenderer::new(&context.device, format, size.width, size.height, sources)?;

        Ok(Self {
            window,
            surface,
            context,
            config,
            renderer,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) -> Result<(), RenderError> {
        // wgpu cannot configure a 0x0 surface; wait for a real size.
        if new_size.width == 0 || new_size.height == 0 {
            return Ok(());
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.context.device, &self.config);
        self.renderer
            .resize(&self.context.device, new_size.width, new_size.height)
    }

    fn drawable_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

struct App {
    title: String,
    spec: SurfaceSpec,
    sources: ShaderSources,
    frames: FrameLoop,
    started: Instant,
    gpu: Option<Gpu>,
    /// Initialization failure captured inside the event loop, returned from `main`.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(title: String, spec: SurfaceSpec, sources: ShaderSources, first_frame: FirstFrame) -> Self {
        Self {
            title,
            spec,
            sources,
            frames: FrameLoop::new(SpinCamera::default(), first_frame),
            started: Instant::now(),
            gpu: None,
            error: None,
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.context.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let size = gpu.drawable_size();
        let mut bound = gpu
            .renderer
            .bind(&gpu.context.device, &gpu.context.queue, &view);
        self.frames.tick(now_ms, size, &mut bound);

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.title, self.spec, &self.sources) {
            Ok(gpu) => {
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("initialization failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                tracing::info!(frames = self.frames.frames(), "closing");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let Some(gpu) = &mut self.gpu else { return };
                if let Err(e) = gpu.resize(new_size) {
                    tracing::error!("resize failed: {e}");
                    self.error = Some(anyhow::Error::new(e).context("failed to resize drawable"));
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("spincube-desktop starting");

    let spec = cli
        .surface
        .parse::<SurfaceSpec>()
        .and_then(|s| s.expect_kind(SurfaceKind::Window))?;
    let sources =
        ShaderSources::with_overrides(cli.vertex_shader.as_deref(), cli.fragment_shader.as_deref())?;
    let first_frame = if cli.legacy_first_frame {
        FirstFrame::SinceOrigin
    } else {
        FirstFrame::Zero
    };

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli.title, spec, sources, first_frame);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
