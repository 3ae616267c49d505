use spincube_render::{RenderError, Result, ShaderStage};

use crate::gpu::scoped;
use crate::shaders::ShaderSources;

/// Where the program expects its inputs: vertex attribute locations,
/// uniform bindings in group 0, and stage entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramLayout {
    pub position_location: u32,
    pub color_location: u32,
    pub projection_binding: u32,
    pub model_view_binding: u32,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

impl Default for ProgramLayout {
    fn default() -> Self {
        Self {
            position_location: 0,
            color_location: 1,
            projection_binding: 0,
            model_view_binding: 1,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
        }
    }
}

/// Vertex buffer slots the pipeline reads from.
pub(crate) const POSITION_SLOT: u32 = 0;
pub(crate) const COLOR_SLOT: u32 = 1;

/// A linked vertex + fragment program: the render pipeline and the layout
/// of the uniforms it reads.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    layout: ProgramLayout,
}

impl ShaderProgram {
    /// Compile both stages and link them into a pipeline that renders into
    /// `color_format` with a `depth_format` depth buffer.
    ///
    /// Fails with [`RenderError::Compile`] carrying the compiler output when a
    /// stage is rejected, or [`RenderError::Link`] when the stages cannot be
    /// combined (mismatched interface, missing entry point, wrong bindings).
    pub fn build(
        device: &wgpu::Device,
        sources: &ShaderSources,
        layout: ProgramLayout,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let vertex = compile_stage(device, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = compile_stage(device, ShaderStage::Fragment, &sources.fragment)?;

        let linked = link(device, &vertex, &fragment, layout, color_format, depth_format);

        // Stage modules are not needed once the pipeline exists (or failed to).
        drop(vertex);
        drop(fragment);

        let (pipeline, uniform_layout) = linked?;
        tracing::info!(?color_format, "shader program linked");

        Ok(Self {
            pipeline,
            uniform_layout,
            layout,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }
}

fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    let label = match stage {
        ShaderStage::Vertex => "cube_vertex_shader",
        ShaderStage::Fragment => "cube_fragment_shader",
    };

    let (module, error) = scoped(device, wgpu::ErrorFilter::Validation, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    });

    match error {
        None => Ok(module),
        Some(log) => {
            drop(module);
            tracing::error!(%stage, "shader compilation failed:\n{log}");
            Err(RenderError::Compile { stage, log })
        }
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<[f32; 16]>() as u64),
        },
        count: None,
    }
}

fn link(
    device: &wgpu::Device,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    layout: ProgramLayout,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
) -> Result<(wgpu::RenderPipeline, wgpu::BindGroupLayout)> {
    let (linked, error) = scoped(device, wgpu::ErrorFilter::Validation, || {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cube_uniform_layout"),
            entries: &[
                uniform_entry(layout.projection_binding),
                uniform_entry(layout.model_view_binding),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let position_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: layout.position_location,
        }];
        let color_attrs = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location: layout.color_location,
        }];

        // Indexed by POSITION_SLOT / COLOR_SLOT.
        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &position_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 4]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &color_attrs,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some(layout.vertex_entry),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(layout.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, uniform_layout)
    });

    match error {
        None => Ok(linked),
        Some(log) => {
            tracing::error!("shader program link failed:\n{log}");
            Err(RenderError::Link { log })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::test_context;
    use crate::renderer::DEPTH_FORMAT;
    use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

    const COLOR: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn build(device: &wgpu::Device, sources: &ShaderSources) -> Result<ShaderProgram> {
        ShaderProgram::build(device, sources, ProgramLayout::default(), COLOR, DEPTH_FORMAT)
    }

    #[test]
    fn default_layout_slots() {
        let layout = ProgramLayout::default();
        assert_eq!(layout.position_location, 0);
        assert_eq!(layout.color_location, 1);
        assert_ne!(layout.projection_binding, layout.model_view_binding);
        assert_eq!(POSITION_SLOT, 0);
        assert_eq!(COLOR_SLOT, 1);
    }

    #[test]
    fn builtin_sources_link() {
        let Some(ctx) = test_context() else { return };
        let program = build(&ctx.device, &ShaderSources::default()).unwrap();
        assert_eq!(program.layout().vertex_entry, "vs_main");
    }

    #[test]
    fn syntax_error_fails_compilation_with_diagnostic() {
        let Some(ctx) = test_context() else { return };
        let broken = VERTEX_SHADER.replace("return out;", "return out");
        let err = build(&ctx.device, &ShaderSources::new(broken, FRAGMENT_SHADER))
            .err()
            .expect("broken source must not produce a program");

        match err {
            RenderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.trim().is_empty());
            }
            other => panic!("expected a compile error, got {other}"),
        }
    }

    #[test]
    fn fragment_syntax_error_names_the_stage() {
        let Some(ctx) = test_context() else { return };
        let err = build(&ctx.device, &ShaderSources::new(VERTEX_SHADER, "@fragment fn fs_main( {"))
            .err()
            .expect("broken source must not produce a program");
        assert!(matches!(
            err,
            RenderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn mismatched_stage_interface_fails_to_link() {
        let Some(ctx) = test_context() else { return };
        let fragment = FRAGMENT_SHADER.replace("@location(0) color: vec4<f32>)", "@location(3) color: vec4<f32>)");
        let err = build(&ctx.device, &ShaderSources::new(VERTEX_SHADER, fragment))
            .err()
            .expect("mismatched stages must not link");
        assert!(matches!(err, RenderError::Link { .. }), "{err}");
        assert!(!err.diagnostic().unwrap_or_default().is_empty());
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let Some(ctx) = test_context() else { return };
        let fragment = FRAGMENT_SHADER.replace("fs_main", "shade");
        let err = build(&ctx.device, &ShaderSources::new(VERTEX_SHADER, fragment))
            .err()
            .expect("missing entry point must not link");
        assert!(matches!(err, RenderError::Link { .. }), "{err}");
    }
}
