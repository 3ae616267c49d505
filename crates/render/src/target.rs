use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;

/// Kind of drawable a surface identifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// An OS window presented to the screen.
    Window,
    /// A texture that is rendered to but never presented.
    Offscreen,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceKind::Window => f.write_str("window"),
            SurfaceKind::Offscreen => f.write_str("offscreen"),
        }
    }
}

/// Parsed drawable-surface identifier.
///
/// Accepted forms: `window`, `window:WIDTHxHEIGHT`, `offscreen:WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub kind: SurfaceKind,
    pub width: u32,
    pub height: u32,
}

impl SurfaceSpec {
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;

    pub fn window(width: u32, height: u32) -> Self {
        Self {
            kind: SurfaceKind::Window,
            width,
            height,
        }
    }

    pub fn offscreen(width: u32, height: u32) -> Self {
        Self {
            kind: SurfaceKind::Offscreen,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Fail with a lookup error unless this surface is of `kind`.
    pub fn expect_kind(self, kind: SurfaceKind) -> Result<Self, RenderError> {
        if self.kind == kind {
            Ok(self)
        } else {
            Err(RenderError::lookup(
                self.to_string(),
                format!("expected kind {kind}, found {}", self.kind),
            ))
        }
    }
}

impl fmt::Display for SurfaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}x{}", self.kind, self.width, self.height)
    }
}

impl FromStr for SurfaceSpec {
    type Err = RenderError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        let (kind, size) = match query.split_once(':') {
            Some((kind, size)) => (kind, Some(size)),
            None => (query, None),
        };

        let kind = match kind.trim() {
            "window" => SurfaceKind::Window,
            "offscreen" => SurfaceKind::Offscreen,
            other => {
                return Err(RenderError::lookup(
                    query,
                    format!("unknown surface kind {other:?}"),
                ));
            }
        };

        let (width, height) = match size {
            Some(size) => parse_size(size).ok_or_else(|| {
                RenderError::lookup(query, "size must be WIDTHxHEIGHT, e.g. 800x600")
            })?,
            None if kind == SurfaceKind::Window => (Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
            None => {
                return Err(RenderError::lookup(query, "offscreen surfaces need a size"));
            }
        };

        if width == 0 || height == 0 {
            return Err(RenderError::lookup(query, "surface has zero size"));
        }

        Ok(Self {
            kind,
            width,
            height,
        })
    }
}

fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (w, h) = size.trim().split_once(['x', 'X'])?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_forms() {
        assert_eq!("window".parse::<SurfaceSpec>().unwrap(), SurfaceSpec::window(800, 600));
        assert_eq!(
            "window:1280x720".parse::<SurfaceSpec>().unwrap(),
            SurfaceSpec::window(1280, 720)
        );
        assert_eq!(
            "offscreen:800x600".parse::<SurfaceSpec>().unwrap(),
            SurfaceSpec::offscreen(800, 600)
        );
    }

    #[test]
    fn rejects_unresolvable_identifiers() {
        for query in ["#webgl-canvas", "offscreen", "window:800", "window:ax600", "offscreen:0x600", ""] {
            let err = query.parse::<SurfaceSpec>().unwrap_err();
            assert!(matches!(err, RenderError::Lookup { .. }), "{query}: {err}");
        }
    }

    #[test]
    fn kind_mismatch_is_a_lookup_error() {
        let spec = SurfaceSpec::offscreen(10, 10);
        assert!(spec.expect_kind(SurfaceKind::Offscreen).is_ok());
        let err = spec.expect_kind(SurfaceKind::Window).unwrap_err();
        assert!(err.to_string().contains("expected kind window, found offscreen"));

        let err = SurfaceSpec::window(10, 10)
            .expect_kind(SurfaceKind::Offscreen)
            .unwrap_err();
        assert!(err.to_string().contains("expected kind offscreen, found window"));
    }

    #[test]
    fn display_round_trips() {
        let spec = SurfaceSpec::window(640, 480);
        assert_eq!(spec.to_string().parse::<SurfaceSpec>().unwrap(), spec);
    }
}
