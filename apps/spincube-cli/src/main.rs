use anyhow::Context;
use clap::{Parser, Subcommand};
use spincube_render::{DebugTextRenderer, FrameLoop, SurfaceKind, SurfaceSpec};
use spincube_render_wgpu::{
    GpuContext, OffscreenTarget, ProgramLayout, ShaderProgram, ShaderSources, WgpuCubeRenderer,
};
use spincube_scene::CubeMesh;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spincube-cli", about = "Headless tools for the spinning cube")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, mesh and crate info
    Info,
    /// Step the frame loop with a fixed time step and print each draw (no GPU)
    Simulate {
        /// Number of frames to draw
        #[arg(short, long, default_value = "4")]
        frames: u32,
        /// Seconds between frames
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Drawable size used for the aspect ratio
        #[arg(long, default_value = "offscreen:800x600")]
        surface: String,
    },
    /// Compile and link the shader program on a headless adapter
    CheckShaders {
        /// WGSL vertex shader to check instead of the built-in one
        #[arg(long)]
        vertex: Option<PathBuf>,
        /// WGSL fragment shader to check instead of the built-in one
        #[arg(long)]
        fragment: Option<PathBuf>,
    },
    /// Render frames into an offscreen texture
    Render {
        /// Offscreen surface, e.g. `offscreen:800x600`
        #[arg(long, default_value = "offscreen:800x600")]
        surface: String,
        /// Number of frames to draw
        #[arg(short, long, default_value = "4")]
        frames: u32,
        /// Seconds between frames
        #[arg(long, default_value = "0.016")]
        dt: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            let mesh = CubeMesh::new();
            println!("spincube-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "mesh: vertices={}, indices={}, triangles={}",
                mesh.positions.len(),
                mesh.indices.len(),
                mesh.triangles().count()
            );
            println!("render: {}", spincube_render::crate_info());
        }
        Commands::Simulate {
            frames,
            dt,
            surface,
        } => {
            let spec: SurfaceSpec = surface.parse()?;
            let mut frame_loop = FrameLoop::default();
            let mut renderer = DebugTextRenderer::new();

            // Elapsed times 0, dt, dt, ...: the first tick of a fresh clock reports none.
            for i in 0..frames {
                let step = if i == 0 { 0.0 } else { dt };
                let line = frame_loop.step(step, spec.size(), &mut renderer);
                println!("{line}");
            }
            println!("final rotation: {:.3}", frame_loop.state().rotation);
        }
        Commands::CheckShaders { vertex, fragment } => {
            let sources = ShaderSources::with_overrides(vertex.as_deref(), fragment.as_deref())?;
            let ctx = GpuContext::headless()?;
            ShaderProgram::build(
                &ctx.device,
                &sources,
                ProgramLayout::default(),
                OffscreenTarget::FORMAT,
                spincube_render_wgpu::DEPTH_FORMAT,
            )
            .context("shader check failed")?;
            println!("shaders OK");
        }
        Commands::Render {
            surface,
            frames,
            dt,
        } => {
            let spec = surface
                .parse::<SurfaceSpec>()
                .and_then(|s| s.expect_kind(SurfaceKind::Offscreen))?;
            let ctx = GpuContext::headless()?;
            let target = OffscreenTarget::new(&ctx.device, spec)?;
            let (width, height) = target.size();
            let mut renderer = WgpuCubeRenderer::new(
                &ctx.device,
                target.format(),
                width,
                height,
                &ShaderSources::default(),
            )?;

            let mut frame_loop = FrameLoop::default();
            for i in 0..frames {
                let step = if i == 0 { 0.0 } else { dt };
                let mut bound = renderer.bind(&ctx.device, &ctx.queue, target.view());
                let stats = frame_loop.step(step, target.size(), &mut bound);
                println!(
                    "frame {i}: rotation={:.3} indices={}",
                    stats.rotation, stats.index_count
                );
            }
            tracing::info!(frames, %spec, "offscreen render complete");
        }
    }

    Ok(())
}
