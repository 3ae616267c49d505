use std::fmt;
use std::path::PathBuf;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors from renderer initialization. All of them are terminal: nothing
/// is drawn after one is returned.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create {resource}: {reason}")]
    ResourceCreation {
        resource: &'static str,
        reason: String,
    },
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link shader program: {log}")]
    Link { log: String },
    #[error("surface {query:?} did not resolve: {reason}")]
    Lookup { query: String, reason: String },
    #[error("failed to read shader source {path:?}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn resource(resource: &'static str, reason: impl fmt::Display) -> Self {
        Self::ResourceCreation {
            resource,
            reason: reason.to_string(),
        }
    }

    pub fn lookup(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Lookup {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Compiler or linker output, when the error carries any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => Some(log),
            _ => None,
        }
    }
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = RenderError::Compile {
            stage: ShaderStage::Fragment,
            log: "expected ';'".into(),
        };
        assert_eq!(err.to_string(), "failed to compile fragment shader: expected ';'");
        assert_eq!(err.diagnostic(), Some("expected ';'"));

        let err = RenderError::resource("adapter", "no compatible GPU");
        assert!(err.to_string().contains("adapter"));
        assert!(err.diagnostic().is_none());
    }

    #[test]
    fn lookup_keeps_the_query() {
        let err = RenderError::lookup("#canvas", "unknown surface kind");
        match err {
            RenderError::Lookup { query, .. } => assert_eq!(query, "#canvas"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
