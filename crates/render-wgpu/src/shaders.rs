use std::borrow::Cow;
use std::path::Path;

use spincube_render::{RenderError, Result};

/// WGSL vertex stage: transforms positions and passes the face color through.
pub const VERTEX_SHADER: &str = r#"
@group(0) @binding(0)
var<uniform> projection: mat4x4<f32>;

@group(0) @binding(1)
var<uniform> model_view: mat4x4<f32>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = projection * model_view * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}
"#;

/// WGSL fragment stage: flat interpolated vertex color.
pub const FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

/// Source text for the two program stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(VERTEX_SHADER),
            fragment: Cow::Borrowed(FRAGMENT_SHADER),
        }
    }
}

impl ShaderSources {
    pub fn new(vertex: impl Into<Cow<'static, str>>, fragment: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Built-in sources with either stage replaced by the file at the given path.
    pub fn with_overrides(vertex: Option<&Path>, fragment: Option<&Path>) -> Result<Self> {
        let mut sources = Self::default();
        if let Some(path) = vertex {
            sources.vertex = Cow::Owned(read_source(path)?);
        }
        if let Some(path) = fragment {
            sources.fragment = Cow::Owned(read_source(path)?);
        }
        Ok(sources)
    }
}

fn read_source(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded shader override");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_builtin() {
        let sources = ShaderSources::default();
        assert!(sources.vertex.contains("fn vs_main"));
        assert!(sources.fragment.contains("fn fs_main"));
        assert!(matches!(sources.vertex, Cow::Borrowed(_)));
    }

    #[test]
    fn stage_interfaces_agree() {
        // Attribute and uniform slots are what `ProgramLayout::default` binds.
        assert!(VERTEX_SHADER.contains("@location(0) position: vec3<f32>"));
        assert!(VERTEX_SHADER.contains("@location(1) color: vec4<f32>"));
        assert!(VERTEX_SHADER.contains("@binding(0)\nvar<uniform> projection"));
        assert!(VERTEX_SHADER.contains("@binding(1)\nvar<uniform> model_view"));
        assert!(FRAGMENT_SHADER.contains("@location(0) color: vec4<f32>"));
    }

    #[test]
    fn missing_override_is_a_source_error() {
        let err = ShaderSources::with_overrides(Some(Path::new("/nonexistent/cube.wgsl")), None)
            .unwrap_err();
        assert!(matches!(err, RenderError::ShaderSource { .. }));
    }

    #[test]
    fn override_replaces_only_the_chosen_stage() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let custom = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0);\n}\n";
        std::fs::write(tmp.path(), custom).unwrap();

        let sources = ShaderSources::with_overrides(None, Some(tmp.path())).unwrap();
        assert_eq!(sources.fragment, custom);
        assert!(matches!(sources.fragment, Cow::Owned(_)));
        assert_eq!(sources.vertex, VERTEX_SHADER);
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let sources = ShaderSources::with_overrides(None, None).unwrap();
        assert_eq!(sources, ShaderSources::default());
    }
}
