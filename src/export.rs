//! File export for both backends.
//!
//! Every export renders fully in memory first, then writes through a temp
//! file in the destination directory that is renamed into place. A failure
//! at any step leaves no file at `path`.

use crate::design::Design;
use crate::diagram::tree::LAYER_ID;
use crate::diagram::{DiagramBackend, DiagramDocument};
use crate::error::{ComposeError, Result};
use crate::layout::LayoutMode;
use crate::output::{OutputKind, RenderSummary};
use crate::pipeline::encode;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Composite every image and write PNG or JPEG (by extension) to `path`.
pub fn export_raster(design: &Design, path: impl AsRef<Path>) -> Result<RenderSummary> {
    let path = path.as_ref();
    let t0 = Instant::now();
    let out = design
        .raster_backend()
        .compose(design.images(), design.config())?;
    let bytes = encode::encode(&out.image, encode::format_for_path(path))?;
    write_atomic(path, &bytes)?;

    Ok(summary(
        design.len(),
        Some(out.plan.mode),
        (out.image.width(), out.image.height()),
        path,
        OutputKind::Raster,
        t0,
    ))
}

/// Write the decorated image at `index` on its own.
pub fn export_raster_image(design: &Design, index: usize, path: impl AsRef<Path>) -> Result<RenderSummary> {
    let path = path.as_ref();
    let t0 = Instant::now();
    let img = design.preprocess_image(index)?;
    let bytes = encode::encode(&img, encode::format_for_path(path))?;
    write_atomic(path, &bytes)?;
    Ok(summary(1, None, img.dimensions(), path, OutputKind::Raster, t0))
}

/// Build the diagram with `backend` and write it as `.drawio` XML.
pub fn export_diagram(design: &Design, backend: &DiagramBackend, path: impl AsRef<Path>) -> Result<RenderSummary> {
    let path = path.as_ref();
    let t0 = Instant::now();
    let doc = backend.build(design.images(), design.config())?;
    write_atomic(path, doc.to_xml()?.as_bytes())?;
    Ok(summary(
        design.len(),
        Some(design.config().layout().mode),
        top_level_size(&doc),
        path,
        OutputKind::Diagram,
        t0,
    ))
}

/// Diagram holding only the image at `index`, at the page origin.
pub fn export_diagram_image(
    design: &Design,
    backend: &DiagramBackend,
    index: usize,
    path: impl AsRef<Path>,
) -> Result<RenderSummary> {
    let path = path.as_ref();
    let t0 = Instant::now();
    let doc = backend.preprocess_image(design.images(), design.config(), index, (0.0, 0.0))?;
    write_atomic(path, doc.to_xml()?.as_bytes())?;
    Ok(summary(1, None, top_level_size(&doc), path, OutputKind::Diagram, t0))
}

/// Write `bytes` to `path` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source| ComposeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn top_level_size(doc: &DiagramDocument) -> (u32, u32) {
    doc.children(LAYER_ID)
        .next()
        .and_then(|c| c.geometry)
        .map(|g| {
            let (x0, y0, x1, y1) = g.extents();
            ((x1 - x0).round() as u32, (y1 - y0).round() as u32)
        })
        .unwrap_or((0, 0))
}

fn summary(
    images: usize,
    layout: Option<LayoutMode>,
    (width, height): (u32, u32),
    path: &Path,
    kind: OutputKind,
    t0: Instant,
) -> RenderSummary {
    let duration_ms = t0.elapsed().as_millis() as u64;
    info!("Wrote {} ({}x{}, {}) in {}ms", path.display(), width, height, kind, duration_ms);
    RenderSummary {
        images,
        layout,
        width,
        height,
        output: path.to_path_buf(),
        kind,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested/dir/out.txt");
        write_atomic(&target, b"hello").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"hello");
        // Only the target remains; no stray temp files.
        let entries: Vec<_> = std::fs::read_dir(target.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn atomic_write_replaces() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out.txt");
        std::fs::write(&target, b"old").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn failed_render_leaves_no_file() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out.png");
        let err = export_raster(&Design::default(), &target).unwrap_err();
        assert!(matches!(err, ComposeError::EmptyInput));
        assert!(!target.exists());
    }
}
