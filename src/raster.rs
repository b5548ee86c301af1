//! Raster backend: decorate every image and composite them into one bitmap.
//!
//! ```text
//! ImageSet ─┬─ resize ─▶ border ─▶ badge ─▶ axes ─┬─▶ composite ─▶ RgbImage
//!           └─ (one image at a time, in order) ───┘
//! ```

use crate::annotate::{self, Annotation};
use crate::config::RenderConfig;
use crate::design::Renderer;
use crate::error::{ComposeError, Result};
use crate::image_set::ImageSet;
use crate::layout::LayoutPlan;
use crate::pipeline::{composite, decorate, resize, text::FontFace};
use crate::progress::ProgressCallback;
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, info};

/// A finished composite plus the plan that placed each image.
#[derive(Debug, Clone)]
pub struct RasterOutput {
    pub image: RgbImage,
    pub plan: LayoutPlan,
}

/// Renders an [`ImageSet`] to pixels.
#[derive(Clone, Default)]
pub struct RasterBackend {
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for RasterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBackend")
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl RasterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Resize, border, badge and axes for the image at `index`, without
    /// compositing.
    pub fn preprocess_image(&self, images: &ImageSet, config: &RenderConfig, index: usize) -> Result<RgbImage> {
        let img = images.get(index)?;
        let ann = Annotation::resolve(config, index)?;
        let font = load_font_if_needed(config, std::slice::from_ref(&ann));
        Ok(decorate_one(img, &ann, config, &font))
    }

    /// Decorate all images and paste them onto one canvas.
    pub fn compose(&self, images: &ImageSet, config: &RenderConfig) -> Result<RasterOutput> {
        if images.is_empty() {
            return Err(ComposeError::EmptyInput);
        }
        let t0 = Instant::now();
        let total = images.len();
        let annotations = annotate::resolve_all(config, total)?;
        let font = load_font_if_needed(config, &annotations);

        info!("Composing {} images ({} layout)", total, config.layout().mode);
        if let Some(cb) = &self.progress {
            cb.on_render_start(total);
        }

        let mut decorated = Vec::with_capacity(total);
        for (i, (img, ann)) in images.iter().zip(&annotations).enumerate() {
            if let Some(cb) = &self.progress {
                cb.on_image_start(i, total);
            }
            let out = decorate_one(img, ann, config, &font);
            debug!("Image {}: {}x{} after decoration", i, out.width(), out.height());
            decorated.push(out);
            if let Some(cb) = &self.progress {
                cb.on_image_complete(i, total);
            }
        }

        let (image, plan) = composite::composite(&decorated, config.layout())?;
        info!(
            "Composite ready: {}x{} in {}ms",
            image.width(),
            image.height(),
            t0.elapsed().as_millis()
        );
        if let Some(cb) = &self.progress {
            cb.on_render_complete(total);
        }
        Ok(RasterOutput { image, plan })
    }
}

impl Renderer for RasterBackend {
    type Output = RasterOutput;

    fn render(&self, images: &ImageSet, config: &RenderConfig) -> Result<RasterOutput> {
        self.compose(images, config)
    }
}

// Font lookup touches the filesystem, so skip it when nothing draws text.
fn load_font_if_needed(config: &RenderConfig, annotations: &[Annotation]) -> FontFace {
    let needs_text = annotations
        .iter()
        .any(|a| a.label.is_some() || a.axis_labels.is_some());
    if needs_text {
        FontFace::load(config.font_family(), config.fonts_dir())
    } else {
        FontFace::Bitmap
    }
}

fn decorate_one(img: &RgbImage, ann: &Annotation, config: &RenderConfig, font: &FontFace) -> RgbImage {
    let resized = resize::resize(img, config.resize());
    let mut out = decorate::expand_border(resized, config.border(), config.border_fill()).into_owned();
    if let Some(text) = &ann.label {
        decorate::draw_badge(&mut out, text, config.border(), config.label(), font);
    }
    if let Some((x, y)) = &ann.axis_labels {
        decorate::draw_axes(&mut out, (x.as_str(), y.as_str()), config.axes(), font);
    }
    out
}
