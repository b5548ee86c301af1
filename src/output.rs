//! Summary returned by every export call.

use crate::layout::LayoutMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which backend produced a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Raster,
    Diagram,
}

impl OutputKind {
    /// `.drawio` and `.xml` are diagrams; everything else is raster.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("drawio") | Some("xml") => OutputKind::Diagram,
            _ => OutputKind::Raster,
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputKind::Raster => "raster",
            OutputKind::Diagram => "diagram",
        })
    }
}

/// What was written and how long it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Images rendered (1 for a single-image export).
    pub images: usize,
    /// `None` for single-image exports.
    pub layout: Option<LayoutMode>,
    /// Canvas size in pixels; for diagrams, the outer group size.
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
    pub kind: OutputKind,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension() {
        assert_eq!(OutputKind::from_path(Path::new("fig.drawio")), OutputKind::Diagram);
        assert_eq!(OutputKind::from_path(Path::new("fig.XML")), OutputKind::Diagram);
        assert_eq!(OutputKind::from_path(Path::new("fig.png")), OutputKind::Raster);
        assert_eq!(OutputKind::from_path(Path::new("fig")), OutputKind::Raster);
    }

    #[test]
    fn summary_serializes() {
        let s = RenderSummary {
            images: 2,
            layout: Some(LayoutMode::Grid),
            width: 250,
            height: 120,
            output: PathBuf::from("out.png"),
            kind: OutputKind::Raster,
            duration_ms: 12,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"layout\":\"grid\""));
        assert!(json.contains("\"kind\":\"raster\""));
    }
}
