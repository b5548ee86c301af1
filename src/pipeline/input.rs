//! Input resolution: read every supported image in a directory.
//!
//! Files are grouped by extension (`png`, then `jpg`, then `jpeg`) and each
//! group is read in directory-iteration order. Nothing is sorted; callers
//! that need a stable order should sort paths themselves and use
//! [`load_paths`], or hand decoded images to
//! [`crate::ImageSet::from_images`].

use crate::error::{ComposeError, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension groups, in load order. Matching is case-sensitive.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// List the image files in `dir`, grouped by extension.
pub fn image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ComposeError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|_| ComposeError::DirectoryNotFound {
            path: dir.to_path_buf(),
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();

    let mut paths = Vec::with_capacity(entries.len());
    for ext in SUPPORTED_EXTENSIONS {
        paths.extend(
            entries
                .iter()
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(*ext))
                .cloned(),
        );
    }
    Ok(paths)
}

/// Decode one file as RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| ComposeError::ImageLoadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.to_rgb8())
}

/// Decode the given files, in order.
pub fn load_paths(paths: &[PathBuf]) -> Result<Vec<RgbImage>> {
    paths.iter().map(|p| load_image(p)).collect()
}

/// Decode every supported image in `dir`. See the module docs for ordering.
pub fn load_images(dir: &Path) -> Result<Vec<RgbImage>> {
    let paths = image_paths(dir)?;
    info!("Loading {} images from {}", paths.len(), dir.display());
    load_paths(&paths)
}
