//! The [`Design`] facade: an image set, its render settings and the
//! backends that turn them into output.
//!
//! ```rust,no_run
//! use figure_composer::{Design, LayoutMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut design = Design::from_dir("figures/", Default::default())?;
//! design.config_mut().set_layout(LayoutMode::Grid);
//! design.config_mut().set_border(4u32)?;
//! let composite = design.compose()?;
//! composite.save("figure.png")?;
//! # Ok(())
//! # }
//! ```

use crate::config::RenderConfig;
use crate::diagram::{DiagramBackend, DiagramDocument};
use crate::error::Result;
use crate::image_set::ImageSet;
use crate::layout::{plan_layout, LayoutPlan};
use crate::pipeline::resize;
use crate::progress::ProgressCallback;
use crate::raster::RasterBackend;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Anything that can turn an image set plus a config into an output.
///
/// Implementations must not modify either input; a failed render leaves no
/// partial state behind.
pub trait Renderer {
    type Output;

    fn render(&self, images: &ImageSet, config: &RenderConfig) -> Result<Self::Output>;
}

/// Images plus settings, rendered on demand.
#[derive(Clone, Default)]
pub struct Design {
    images: ImageSet,
    config: RenderConfig,
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for Design {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Design")
            .field("images", &self.images.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Design {
    pub fn new(images: ImageSet, config: RenderConfig) -> Self {
        Self {
            images,
            config,
            progress: None,
        }
    }

    /// Load every image in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>, config: RenderConfig) -> Result<Self> {
        Ok(Self::new(ImageSet::from_dir(dir)?, config))
    }

    pub fn from_images<I>(images: I, config: RenderConfig) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DynamicImage>,
    {
        Self::new(ImageSet::from_images(images), config)
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    // ── Images ───────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&RgbImage> {
        self.images.get(index)
    }

    pub fn push(&mut self, img: impl Into<DynamicImage>) {
        self.images.push(img);
    }

    pub fn replace(&mut self, index: usize, img: impl Into<DynamicImage>) -> Result<RgbImage> {
        self.images.replace(index, img)
    }

    pub fn remove(&mut self, index: usize) -> Result<RgbImage> {
        self.images.remove(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RgbImage> {
        self.images.iter()
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    // ── Settings ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub(crate) fn raster_backend(&self) -> RasterBackend {
        match &self.progress {
            Some(cb) => RasterBackend::new().with_progress(cb.clone()),
            None => RasterBackend::new(),
        }
    }

    /// Layout both backends will use: resized size plus border per image.
    pub fn plan(&self) -> Result<LayoutPlan> {
        plan_layout(&footprints(&self.images, &self.config), self.config.layout())
    }

    /// Composite bitmap of every decorated image.
    pub fn compose(&self) -> Result<RgbImage> {
        Ok(self.raster_backend().compose(&self.images, &self.config)?.image)
    }

    /// One decorated image, not composited.
    pub fn preprocess_image(&self, index: usize) -> Result<RgbImage> {
        self.raster_backend()
            .preprocess_image(&self.images, &self.config, index)
    }

    /// Diagram document with random cell ids.
    pub fn diagram(&self) -> Result<DiagramDocument> {
        let backend = match &self.progress {
            Some(cb) => DiagramBackend::new().with_progress(cb.clone()),
            None => DiagramBackend::new(),
        };
        backend.build(&self.images, &self.config)
    }

    /// Serialized draw.io XML.
    pub fn diagram_xml(&self) -> Result<String> {
        self.diagram()?.to_xml()
    }

    /// Render with any backend.
    pub fn render_with<R: Renderer>(&self, renderer: &R) -> Result<R::Output> {
        renderer.render(&self.images, &self.config)
    }
}

/// Decorated `(width, height)` of every image: resized size plus border.
pub fn footprints(images: &ImageSet, config: &RenderConfig) -> Vec<(u32, u32)> {
    let border = config.border();
    images
        .sizes()
        .into_iter()
        .map(|size| {
            let (w, h) = resize::target_size(size, config.resize()).unwrap_or(size);
            (w + border.horizontal(), h + border.vertical())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComposeError;
    use image::Rgb;

    fn design(n: usize) -> Design {
        Design::from_images(
            (0..n).map(|_| RgbImage::from_pixel(30, 20, Rgb([9, 9, 9]))),
            RenderConfig::default(),
        )
    }

    struct CountingRenderer;

    impl Renderer for CountingRenderer {
        type Output = usize;

        fn render(&self, images: &ImageSet, _config: &RenderConfig) -> Result<usize> {
            Ok(images.len())
        }
    }

    #[test]
    fn custom_renderer() {
        assert_eq!(design(4).render_with(&CountingRenderer).unwrap(), 4);
    }

    #[test]
    fn compose_uses_config() {
        let mut d = design(2);
        d.config_mut().set_label_enabled(false);
        d.config_mut().set_border(0u32).unwrap();
        d.config_mut().set_spacing(0);
        let img = d.compose().unwrap();
        assert_eq!(img.dimensions(), (60, 20));
    }

    #[test]
    fn edits_reflect_in_render() {
        let mut d = design(3);
        d.config_mut().set_label_enabled(false);
        d.remove(1).unwrap();
        assert_eq!(d.len(), 2);
        assert!(matches!(d.preprocess_image(2), Err(ComposeError::IndexOutOfRange { .. })));
        let first = d.preprocess_image(0).unwrap();
        assert_eq!(first.dimensions(), (50, 40));
    }

    #[test]
    fn plan_matches_composite() {
        let mut d = design(3);
        d.config_mut().set_layout(crate::LayoutMode::Column);
        let plan = d.plan().unwrap();
        let img = d.compose().unwrap();
        assert_eq!((plan.width, plan.height), img.dimensions());
        assert_eq!(plan.positions[1], (0, 50));
    }

    #[test]
    fn empty_design() {
        let d = Design::default();
        assert!(d.is_empty());
        assert!(matches!(d.compose(), Err(ComposeError::EmptyInput)));
        assert!(matches!(d.diagram(), Err(ComposeError::EmptyInput)));
    }
}
