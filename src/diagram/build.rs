//! Diagram backend: turn an image set into draw.io cells.
//!
//! Geometry is shared with the raster backend. The layout is planned over
//! each image's bordered footprint and image cells sit at plan position plus
//! the left/top inset. Badge and axis coordinates are the raster ones shifted
//! by that same inset, so both outputs line up.

use super::ids::{IdGenerator, IdStrategy};
use super::tree::{Cell, CellKind, DiagramDocument, Geometry, LAYER_ID};
use crate::annotate::{self, Annotation};
use crate::config::RenderConfig;
use crate::design::{footprints, Renderer};
use crate::error::{ComposeError, Result};
use crate::geometry::{axis_geometry, estimate_text_width, label_rect, Point};
use crate::image_set::ImageSet;
use crate::layout::plan_layout;
use crate::pipeline::{encode, resize};
use crate::progress::ProgressCallback;
use image::RgbImage;
use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_HOST: &str = "figure-composer";
pub const DEFAULT_PAGE_NAME: &str = "Figure";

/// Page margin of the outer group.
const GROUP_ORIGIN: (f64, f64) = (30.0, 30.0);

/// Builds [`DiagramDocument`]s.
#[derive(Clone)]
pub struct DiagramBackend {
    ids: IdStrategy,
    host: String,
    page_name: String,
    progress: Option<ProgressCallback>,
}

impl Default for DiagramBackend {
    fn default() -> Self {
        Self {
            ids: IdStrategy::Random,
            host: DEFAULT_HOST.to_string(),
            page_name: DEFAULT_PAGE_NAME.to_string(),
            progress: None,
        }
    }
}

impl std::fmt::Debug for DiagramBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramBackend")
            .field("ids", &self.ids)
            .field("host", &self.host)
            .field("page_name", &self.page_name)
            .finish()
    }
}

/// Per-call state: the document under construction and its id source.
struct Builder<'a> {
    doc: DiagramDocument,
    ids: IdGenerator,
    config: &'a RenderConfig,
}

impl DiagramBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_strategy(mut self, ids: IdStrategy) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_page_name(mut self, name: impl Into<String>) -> Self {
        self.page_name = name.into();
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn start<'a>(&self, config: &'a RenderConfig) -> Builder<'a> {
        let mut ids = IdGenerator::new(self.ids);
        let doc = DiagramDocument::new(&self.host, &self.page_name, ids.page_id());
        Builder { doc, ids, config }
    }

    /// Full document: one outer group holding every image cell.
    pub fn build(&self, images: &ImageSet, config: &RenderConfig) -> Result<DiagramDocument> {
        if images.is_empty() {
            return Err(ComposeError::EmptyInput);
        }
        let t0 = Instant::now();
        let total = images.len();
        let annotations = annotate::resolve_all(config, total)?;
        let resized: Vec<Cow<'_, RgbImage>> = images
            .iter()
            .map(|img| resize::resize(img, config.resize()))
            .collect();

        let border = config.border();
        let plan = plan_layout(&footprints(images, config), config.layout())?;

        info!("Building diagram for {} images ({} layout)", total, plan.mode);
        if let Some(cb) = &self.progress {
            cb.on_render_start(total);
        }

        let mut b = self.start(config);
        let group_id = b.ids.next("-group");
        let group_idx = b.doc.add(Cell::new(
            group_id.clone(),
            LAYER_ID,
            CellKind::Group,
            "",
            "group",
            Geometry::bounds(GROUP_ORIGIN.0, GROUP_ORIGIN.1, 0.0, 0.0),
        ))?;

        let (mut right, mut bottom) = (0.0f64, 0.0f64);
        for (i, ((img, ann), &(px, py))) in resized
            .iter()
            .zip(&annotations)
            .zip(&plan.positions)
            .enumerate()
        {
            if let Some(cb) = &self.progress {
                cb.on_image_start(i, total);
            }
            let origin = ((px + border.left) as f64, (py + border.top) as f64);
            let geom = b.image_cell(i, img, ann, origin, &group_id)?;
            let (_, _, r, btm) = geom.extents();
            right = right.max(r);
            bottom = bottom.max(btm);
            if let Some(cb) = &self.progress {
                cb.on_image_complete(i, total);
            }
        }

        b.doc.set_geometry(
            group_idx,
            Geometry::bounds(GROUP_ORIGIN.0, GROUP_ORIGIN.1, right, bottom),
        );
        info!(
            "Diagram ready: {} cells in {}ms",
            b.doc.cells().len(),
            t0.elapsed().as_millis()
        );
        if let Some(cb) = &self.progress {
            cb.on_render_complete(total);
        }
        Ok(b.doc)
    }

    /// Document holding only the image at `index`, placed at `position`
    /// directly under the layer cell.
    pub fn preprocess_image(
        &self,
        images: &ImageSet,
        config: &RenderConfig,
        index: usize,
        position: (f64, f64),
    ) -> Result<DiagramDocument> {
        let img = images.get(index)?;
        let ann = Annotation::resolve(config, index)?;
        let resized = resize::resize(img, config.resize());

        let mut b = self.start(config);
        b.image_cell(index, &resized, &ann, position, LAYER_ID)?;
        Ok(b.doc)
    }
}

impl Renderer for DiagramBackend {
    type Output = DiagramDocument;

    fn render(&self, images: &ImageSet, config: &RenderConfig) -> Result<DiagramDocument> {
        self.build(images, config)
    }
}

impl Builder<'_> {
    /// Image cell plus its badge and axis children. Returns the image
    /// geometry.
    fn image_cell(
        &mut self,
        index: usize,
        img: &RgbImage,
        ann: &Annotation,
        origin: (f64, f64),
        parent: &str,
    ) -> Result<Geometry> {
        let config = self.config;
        let border = config.border();
        let (w, h) = img.dimensions();
        let b64 = encode::encode_png_base64(img)?;

        let style = format!(
            "shape=image;verticalLabelPosition=bottom;labelBackgroundColor=default;\
             verticalAlign=top;aspect=fixed;imageAspect=0;image=data:image/png,{};\
             imageBorder={};strokeWidth={};",
            b64,
            config.border_fill().to_style_value(),
            border.max()
        );
        let geom = Geometry::bounds(origin.0, origin.1, w as f64, h as f64);
        let id = self.ids.next(&format!("-{}", index + 1));
        self.doc
            .add(Cell::new(id.clone(), parent, CellKind::Image, "", style, geom))?;
        debug!("Image {}: cell {} at ({}, {}) {}x{}", index, id, origin.0, origin.1, w, h);

        if let Some(text) = &ann.label {
            self.badge(text, (w, h), &id)?;
        }
        if let Some((lx, ly)) = &ann.axis_labels {
            self.axes(lx, ly, h, &id)?;
        }
        Ok(geom)
    }

    fn badge(&mut self, text: &str, (w, h): (u32, u32), parent: &str) -> Result<()> {
        let config = self.config;
        let border = config.border();
        let label = config.label();
        let rect = label_rect(
            w + border.horizontal(),
            h + border.vertical(),
            border,
            label.corner,
            label.badge_size,
        )
        .translate(-(border.left as i32), -(border.top as i32));

        let value = format!(
            "<font face=\"{}\" style=\"color: {};\">{}</font>",
            config.font_family(),
            label.text_color.to_style_value(),
            quick_xml::escape::escape(text)
        );
        let style = format!(
            "rounded=0;whiteSpace=wrap;html=1;strokeColor=none;fillColor={};fontSize={};",
            label.badge_fill.to_style_value(),
            label.font_size
        );
        let geom = Geometry::bounds(
            rect.x0 as f64,
            rect.y0 as f64,
            rect.width() as f64,
            rect.height() as f64,
        );
        let id = self.ids.next("-numbering");
        self.doc
            .add(Cell::new(id, parent, CellKind::Label, value, style, geom))?;
        Ok(())
    }

    fn axes(&mut self, label_x: &str, label_y: &str, image_h: u32, parent: &str) -> Result<()> {
        let config = self.config;
        let border = config.border();
        let axes = config.axes();
        let font = axes.font_size;

        // Axis geometry on the bordered image, shifted into image-cell space.
        let g = axis_geometry(image_h + border.vertical(), axes.offset, axes.length, axes.stroke_width);
        let (dx, dy) = (-(border.left as f64), -(border.top as f64));
        let shift = |(x, y): Point| (x as f64 + dx, y as f64 + dy);

        let x_line = Geometry::Line {
            source: shift(g.origin),
            target: shift(g.x_tip),
        };
        let y_line = Geometry::Line {
            source: shift(g.origin),
            target: shift(g.y_tip),
        };
        let (ax, ay) = shift(g.x_label_anchor(font));
        let (bx, by) = shift(g.y_label_anchor(font));
        let x_text = Geometry::bounds(ax, ay, estimate_text_width(label_x, font) as f64, font as f64);
        let y_text = Geometry::bounds(bx, by, estimate_text_width(label_y, font) as f64, font as f64);

        // Group bounds are the union of the children.
        let (mut x0, mut y0, mut x1, mut y1) = x_line.extents();
        for child in [&y_line, &x_text, &y_text] {
            let (a, b, c, d) = child.extents();
            x0 = x0.min(a);
            y0 = y0.min(b);
            x1 = x1.max(c);
            y1 = y1.max(d);
        }

        let group_id = self.ids.next("-axisgroup");
        self.doc.add(Cell::new(
            group_id.clone(),
            parent,
            CellKind::Group,
            "",
            "group",
            Geometry::bounds(x0, y0, x1 - x0, y1 - y0),
        ))?;

        let color = axes.color.to_style_value();
        let line_style = format!(
            "endArrow=blockThin;html=1;rounded=0;strokeWidth={};strokeColor={};",
            axes.stroke_width, color
        );
        let text_style = format!(
            "text;html=1;align=left;verticalAlign=middle;resizable=0;points=[];autosize=1;\
             strokeColor=none;fillColor=none;fontFamily={};fontColor={};fontSize={};",
            config.font_family(),
            color,
            font
        );

        let children = [
            ("-xaxis", CellKind::AxisLine, "", &line_style, x_line),
            ("-yaxis", CellKind::AxisLine, "", &line_style, y_line),
            ("-xlabel", CellKind::AxisLabel, label_x, &text_style, x_text),
            ("-ylabel", CellKind::AxisLabel, label_y, &text_style, y_text),
        ];
        for (suffix, kind, value, style, geom) in children {
            let id = self.ids.next(suffix);
            self.doc.add(Cell::new(
                id,
                &group_id,
                kind,
                value,
                style.as_str(),
                geom.translate(-x0, -y0),
            ))?;
        }
        Ok(())
    }
}
