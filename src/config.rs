//! Configuration types for figure composition.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`] or mutated in place with the `set_*` methods.
//! Both paths run the same validation, so a `RenderConfig` that exists is
//! always valid; invalid values are rejected at the moment they are assigned.
//!
//! The one exception to fail-fast is the font family: an unknown family is
//! replaced by [`DEFAULT_FONT_FAMILY`] with a warning.

use crate::color::Color;
use crate::error::{ComposeError, Result};
use crate::geometry::{AxisOffset, BorderInsets, Corner, Size2};
use crate::label::{format_label, LabelMode};
use crate::layout::{LayoutMode, LayoutOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Family used when the requested one cannot be found.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

// ── Label source ─────────────────────────────────────────────────────────

/// Where badge text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LabelSourceRepr", into = "LabelSourceRepr")]
pub enum LabelSource {
    /// Generated from the image index.
    Mode(LabelMode),
    /// The same text on every image.
    Fixed(String),
    /// One entry per image, by index.
    PerImage(Vec<String>),
    /// No badge.
    None,
}

impl LabelSource {
    /// A recognised mode name becomes [`LabelSource::Mode`]; any other text is
    /// a fixed label.
    pub fn parse(s: &str) -> Self {
        s.parse::<LabelMode>()
            .map(LabelSource::Mode)
            .unwrap_or_else(|_| LabelSource::Fixed(s.to_string()))
    }

    /// Text for the image at `index`; `None` when there is nothing to draw.
    pub fn resolve(&self, index: usize) -> Result<Option<String>> {
        let text = match self {
            LabelSource::Mode(mode) => format_label(index, *mode)?,
            LabelSource::PerImage(labels) => {
                labels
                    .get(index)
                    .cloned()
                    .ok_or(ComposeError::IndexOutOfRange {
                        what: "label",
                        index,
                        len: labels.len(),
                    })?
            }
            LabelSource::Fixed(text) => text.clone(),
            LabelSource::None => return Ok(None),
        };
        Ok(Some(text).filter(|t| !t.is_empty()))
    }
}

impl From<LabelMode> for LabelSource {
    fn from(m: LabelMode) -> Self {
        LabelSource::Mode(m)
    }
}

impl From<&str> for LabelSource {
    fn from(s: &str) -> Self {
        LabelSource::parse(s)
    }
}

impl From<Vec<String>> for LabelSource {
    fn from(v: Vec<String>) -> Self {
        LabelSource::PerImage(v)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LabelSourceRepr {
    Text(String),
    List(Vec<String>),
    Null(Option<()>),
}

impl TryFrom<LabelSourceRepr> for LabelSource {
    type Error = ComposeError;

    fn try_from(repr: LabelSourceRepr) -> Result<Self> {
        Ok(match repr {
            LabelSourceRepr::Text(s) => LabelSource::parse(&s),
            LabelSourceRepr::List(v) => LabelSource::PerImage(v),
            LabelSourceRepr::Null(_) => LabelSource::None,
        })
    }
}

impl From<LabelSource> for LabelSourceRepr {
    fn from(src: LabelSource) -> Self {
        match src {
            LabelSource::Mode(m) => LabelSourceRepr::Text(m.as_str().to_string()),
            LabelSource::Fixed(s) => LabelSourceRepr::Text(s),
            LabelSource::PerImage(v) => LabelSourceRepr::List(v),
            LabelSource::None => LabelSourceRepr::Null(None),
        }
    }
}

// ── Axis labels ──────────────────────────────────────────────────────────

/// Text at the end of each axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisLabels {
    /// The same pair on every image.
    Global { x: String, y: String },
    /// One pair per image, by index.
    PerImage { x: Vec<String>, y: Vec<String> },
}

impl Default for AxisLabels {
    fn default() -> Self {
        AxisLabels::Global {
            x: "X".into(),
            y: "Y".into(),
        }
    }
}

impl AxisLabels {
    pub fn global(x: impl Into<String>, y: impl Into<String>) -> Self {
        AxisLabels::Global {
            x: x.into(),
            y: y.into(),
        }
    }

    /// `(x, y)` labels for the image at `index`.
    pub fn resolve(&self, index: usize) -> Result<(String, String)> {
        match self {
            AxisLabels::Global { x, y } => Ok((x.clone(), y.clone())),
            AxisLabels::PerImage { x, y } => {
                let pick = |v: &Vec<String>| {
                    v.get(index).cloned().ok_or(ComposeError::IndexOutOfRange {
                        what: "axis label",
                        index,
                        len: v.len(),
                    })
                };
                Ok((pick(x)?, pick(y)?))
            }
        }
    }
}

// ── Blocks ───────────────────────────────────────────────────────────────

/// Badge ("signature") settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub enabled: bool,
    pub source: LabelSource,
    pub corner: Corner,
    /// Badge rectangle size. Default: 40 × 40.
    pub badge_size: Size2,
    pub badge_fill: Color,
    pub text_color: Color,
    /// Default: 24.
    pub font_size: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: LabelSource::Mode(LabelMode::LatinLower),
            corner: Corner::TopLeft,
            badge_size: Size2 {
                width: 40,
                height: 40,
            },
            badge_fill: Color::black(),
            text_color: Color::white(),
            font_size: 24,
        }
    }
}

/// Coordinate-axis overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub enabled: bool,
    pub labels: AxisLabels,
    /// Origin distance from the bottom-left corner. Default: 20.
    pub offset: AxisOffset,
    /// Default: 60.
    pub length: u32,
    /// Stroke width; arrowheads scale with it. Default: 3.
    pub stroke_width: u32,
    /// Default: 24.
    pub font_size: u32,
    /// Default: black.
    pub color: Color,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            labels: AxisLabels::default(),
            offset: AxisOffset::from(20),
            length: 60,
            stroke_width: 3,
            font_size: 24,
            color: Color::black(),
        }
    }
}

/// Optional per-image resize applied before decoration.
///
/// Only width → height follows the aspect ratio (and vice versa); both →
/// exact stretch; neither → no resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeSpec {
    pub fn is_noop(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

// ── RenderConfig ─────────────────────────────────────────────────────────

/// Every rendering parameter for both backends.
///
/// # Example
/// ```rust
/// use figure_composer::{RenderConfig, LayoutMode};
///
/// let config = RenderConfig::builder()
///     .border(5u32)
///     .label_source("roman")
///     .axes(true)
///     .layout(LayoutMode::Grid)
///     .build()
///     .unwrap();
/// assert_eq!(config.border().left, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RenderConfigRepr")]
pub struct RenderConfig {
    border: BorderInsets,
    border_fill: Color,
    label: LabelConfig,
    axes: AxisConfig,
    font_family: String,
    fonts_dir: Option<PathBuf>,
    layout: LayoutOptions,
    resize: ResizeSpec,
}

/// Wire form of [`RenderConfig`]. Converting it runs the font fallback and
/// [`RenderConfig::validate`], as the setters do.
#[derive(Deserialize)]
#[serde(default)]
struct RenderConfigRepr {
    border: BorderInsets,
    border_fill: Color,
    label: LabelConfig,
    axes: AxisConfig,
    font_family: String,
    fonts_dir: Option<PathBuf>,
    layout: LayoutOptions,
    resize: ResizeSpec,
}

impl Default for RenderConfigRepr {
    fn default() -> Self {
        let c = RenderConfig::default();
        Self {
            border: c.border,
            border_fill: c.border_fill,
            label: c.label,
            axes: c.axes,
            font_family: c.font_family,
            fonts_dir: c.fonts_dir,
            layout: c.layout,
            resize: c.resize,
        }
    }
}

impl TryFrom<RenderConfigRepr> for RenderConfig {
    type Error = ComposeError;

    fn try_from(repr: RenderConfigRepr) -> Result<Self> {
        let mut config = RenderConfig {
            border: repr.border,
            border_fill: repr.border_fill,
            label: repr.label,
            axes: repr.axes,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            fonts_dir: repr.fonts_dir,
            layout: repr.layout,
            resize: repr.resize,
        };
        if repr.font_family != DEFAULT_FONT_FAMILY {
            config.set_font_family(&repr.font_family);
        }
        config.validate()?;
        Ok(config)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            border: BorderInsets::uniform(10),
            border_fill: Color::black(),
            label: LabelConfig::default(),
            axes: AxisConfig::default(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            fonts_dir: None,
            layout: LayoutOptions::default(),
            resize: ResizeSpec::default(),
        }
    }
}

fn positive(what: &str, v: u32) -> Result<u32> {
    if v == 0 {
        return Err(ComposeError::InvalidConfig(format!("{what} must be ≥ 1, got 0")));
    }
    Ok(v)
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
            error: None,
        }
    }

    // ── Getters ──────────────────────────────────────────────────────────

    pub fn border(&self) -> BorderInsets {
        self.border
    }

    pub fn border_fill(&self) -> &Color {
        &self.border_fill
    }

    pub fn label(&self) -> &LabelConfig {
        &self.label
    }

    pub fn axes(&self) -> &AxisConfig {
        &self.axes
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    pub fn resize(&self) -> ResizeSpec {
        self.resize
    }

    // ── Border ───────────────────────────────────────────────────────────

    /// Integer, four sides, or `None` for no border.
    pub fn set_border<B>(&mut self, border: B) -> Result<()>
    where
        B: TryInto<BorderInsets>,
        ComposeError: From<B::Error>,
    {
        self.border = border.try_into()?;
        Ok(())
    }

    pub fn set_border_fill<C>(&mut self, color: C) -> Result<()>
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.border_fill = color.try_into()?;
        Ok(())
    }

    // ── Label ────────────────────────────────────────────────────────────

    pub fn set_label_enabled(&mut self, enabled: bool) {
        self.label.enabled = enabled;
    }

    pub fn set_label_source(&mut self, source: impl Into<LabelSource>) {
        self.label.source = source.into();
    }

    pub fn set_label_corner(&mut self, corner: Corner) {
        self.label.corner = corner;
    }

    /// Parse a corner name (`top-left`, …); unknown names fail with
    /// [`ComposeError::InvalidPosition`].
    pub fn set_label_corner_name(&mut self, name: &str) -> Result<()> {
        self.label.corner = name.parse()?;
        Ok(())
    }

    pub fn set_badge_size<S>(&mut self, size: S) -> Result<()>
    where
        S: TryInto<Size2>,
        ComposeError: From<S::Error>,
    {
        self.label.badge_size = size.try_into()?;
        Ok(())
    }

    pub fn set_badge_fill<C>(&mut self, color: C) -> Result<()>
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.label.badge_fill = color.try_into()?;
        Ok(())
    }

    pub fn set_label_color<C>(&mut self, color: C) -> Result<()>
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.label.text_color = color.try_into()?;
        Ok(())
    }

    pub fn set_label_font_size(&mut self, size: u32) -> Result<()> {
        self.label.font_size = positive("label font size", size)?;
        Ok(())
    }

    // ── Axes ─────────────────────────────────────────────────────────────

    pub fn set_axes_enabled(&mut self, enabled: bool) {
        self.axes.enabled = enabled;
    }

    pub fn set_axis_labels(&mut self, labels: AxisLabels) {
        self.axes.labels = labels;
    }

    pub fn set_axis_offset<O>(&mut self, offset: O) -> Result<()>
    where
        O: TryInto<AxisOffset>,
        ComposeError: From<O::Error>,
    {
        self.axes.offset = offset.try_into()?;
        Ok(())
    }

    pub fn set_axis_length(&mut self, length: u32) -> Result<()> {
        self.axes.length = positive("axis length", length)?;
        Ok(())
    }

    pub fn set_axis_width(&mut self, width: u32) -> Result<()> {
        self.axes.stroke_width = positive("axis width", width)?;
        Ok(())
    }

    pub fn set_axis_font_size(&mut self, size: u32) -> Result<()> {
        self.axes.font_size = positive("axis font size", size)?;
        Ok(())
    }

    pub fn set_axis_color<C>(&mut self, color: C) -> Result<()>
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.axes.color = color.try_into()?;
        Ok(())
    }

    // ── Font ─────────────────────────────────────────────────────────────

    /// Set the font family. Families that cannot be found in the fonts
    /// directory or among system fonts fall back to [`DEFAULT_FONT_FAMILY`].
    pub fn set_font_family(&mut self, family: &str) {
        let family = family.trim();
        if font_locate::is_available(family, self.fonts_dir()) {
            self.font_family = family.to_string();
        } else {
            warn!(
                "Font family '{}' not found; falling back to '{}'",
                family, DEFAULT_FONT_FAMILY
            );
            self.font_family = DEFAULT_FONT_FAMILY.to_string();
        }
    }

    pub fn set_fonts_dir(&mut self, dir: Option<PathBuf>) {
        self.fonts_dir = dir;
    }

    // ── Layout ───────────────────────────────────────────────────────────

    pub fn set_layout(&mut self, mode: LayoutMode) {
        self.layout.mode = mode;
    }

    /// Parse a layout name; unknown names fail with
    /// [`ComposeError::InvalidLayout`].
    pub fn set_layout_name(&mut self, name: &str) -> Result<()> {
        self.layout.mode = name.parse()?;
        Ok(())
    }

    pub fn set_spacing(&mut self, spacing: u32) {
        self.layout.spacing = spacing;
    }

    pub fn set_background<C>(&mut self, color: C) -> Result<()>
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.layout.background = color.try_into()?;
        Ok(())
    }

    pub fn set_grid(&mut self, cols: Option<u32>, rows: Option<u32>) -> Result<()> {
        let cols = cols.map(|c| positive("grid columns", c)).transpose()?;
        let rows = rows.map(|r| positive("grid rows", r)).transpose()?;
        self.layout.cols = cols;
        self.layout.rows = rows;
        Ok(())
    }

    // ── Resize ───────────────────────────────────────────────────────────

    pub fn set_resize(&mut self, width: Option<u32>, height: Option<u32>) -> Result<()> {
        let width = width.map(|w| positive("resize width", w)).transpose()?;
        let height = height.map(|h| positive("resize height", h)).transpose()?;
        self.resize = ResizeSpec { width, height };
        Ok(())
    }

    // ── Resolution ───────────────────────────────────────────────────────

    /// Badge text for the image at `index`, or `None` when labels are off or
    /// resolve to nothing.
    pub fn resolve_label(&self, index: usize) -> Result<Option<String>> {
        if !self.label.enabled {
            return Ok(None);
        }
        self.label.source.resolve(index)
    }

    /// Axis label pair for the image at `index`, or `None` when axes are off.
    pub fn resolve_axis_labels(&self, index: usize) -> Result<Option<(String, String)>> {
        if !self.axes.enabled {
            return Ok(None);
        }
        self.axes.labels.resolve(index).map(Some)
    }

    /// Re-run every numeric check; used after deserialisation.
    pub fn validate(&self) -> Result<()> {
        positive("label font size", self.label.font_size)?;
        positive("axis length", self.axes.length)?;
        positive("axis width", self.axes.stroke_width)?;
        positive("axis font size", self.axes.font_size)?;
        if let Some(c) = self.layout.cols {
            positive("grid columns", c)?;
        }
        if let Some(r) = self.layout.rows {
            positive("grid rows", r)?;
        }
        if let Some(w) = self.resize.width {
            positive("resize width", w)?;
        }
        if let Some(h) = self.resize.height {
            positive("resize height", h)?;
        }
        Ok(())
    }

    /// Parse a JSON config. Values go through the same checks and font
    /// fallback as the setters.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ComposeError::InvalidConfig(e.to_string()))
    }
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Builder for [`RenderConfig`].
///
/// Each method runs the matching `set_*` validation; the first failure is
/// kept and returned by [`build`](Self::build).
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
    error: Option<ComposeError>,
}

impl RenderConfigBuilder {
    fn apply(mut self, f: impl FnOnce(&mut RenderConfig) -> Result<()>) -> Self {
        if self.error.is_none() {
            if let Err(e) = f(&mut self.config) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn border<B>(self, border: B) -> Self
    where
        B: TryInto<BorderInsets>,
        ComposeError: From<B::Error>,
    {
        self.apply(|c| c.set_border(border))
    }

    pub fn border_fill<C>(self, color: C) -> Self
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.apply(|c| c.set_border_fill(color))
    }

    pub fn label(self, enabled: bool) -> Self {
        self.apply(|c| {
            c.set_label_enabled(enabled);
            Ok(())
        })
    }

    pub fn label_source(self, source: impl Into<LabelSource>) -> Self {
        let source = source.into();
        self.apply(|c| {
            c.set_label_source(source);
            Ok(())
        })
    }

    pub fn label_corner(self, corner: Corner) -> Self {
        self.apply(|c| {
            c.set_label_corner(corner);
            Ok(())
        })
    }

    pub fn badge_size<S>(self, size: S) -> Self
    where
        S: TryInto<Size2>,
        ComposeError: From<S::Error>,
    {
        self.apply(|c| c.set_badge_size(size))
    }

    pub fn badge_fill<C>(self, color: C) -> Self
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.apply(|c| c.set_badge_fill(color))
    }

    pub fn label_color<C>(self, color: C) -> Self
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.apply(|c| c.set_label_color(color))
    }

    pub fn label_font_size(self, size: u32) -> Self {
        self.apply(|c| c.set_label_font_size(size))
    }

    pub fn axes(self, enabled: bool) -> Self {
        self.apply(|c| {
            c.set_axes_enabled(enabled);
            Ok(())
        })
    }

    pub fn axis_labels(self, labels: AxisLabels) -> Self {
        self.apply(|c| {
            c.set_axis_labels(labels);
            Ok(())
        })
    }

    pub fn axis_offset<O>(self, offset: O) -> Self
    where
        O: TryInto<AxisOffset>,
        ComposeError: From<O::Error>,
    {
        self.apply(|c| c.set_axis_offset(offset))
    }

    pub fn axis_length(self, length: u32) -> Self {
        self.apply(|c| c.set_axis_length(length))
    }

    pub fn axis_width(self, width: u32) -> Self {
        self.apply(|c| c.set_axis_width(width))
    }

    pub fn axis_font_size(self, size: u32) -> Self {
        self.apply(|c| c.set_axis_font_size(size))
    }

    pub fn axis_color<C>(self, color: C) -> Self
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.apply(|c| c.set_axis_color(color))
    }

    pub fn fonts_dir(self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.apply(|c| {
            c.set_fonts_dir(Some(dir));
            Ok(())
        })
    }

    pub fn font_family(self, family: &str) -> Self {
        self.apply(|c| {
            c.set_font_family(family);
            Ok(())
        })
    }

    pub fn layout(self, mode: LayoutMode) -> Self {
        self.apply(|c| {
            c.set_layout(mode);
            Ok(())
        })
    }

    pub fn layout_name(self, name: &str) -> Self {
        self.apply(|c| c.set_layout_name(name))
    }

    pub fn spacing(self, spacing: u32) -> Self {
        self.apply(|c| {
            c.set_spacing(spacing);
            Ok(())
        })
    }

    pub fn background<C>(self, color: C) -> Self
    where
        C: TryInto<Color>,
        ComposeError: From<C::Error>,
    {
        self.apply(|c| c.set_background(color))
    }

    pub fn grid(self, cols: Option<u32>, rows: Option<u32>) -> Self {
        self.apply(|c| c.set_grid(cols, rows))
    }

    pub fn resize(self, width: Option<u32>, height: Option<u32>) -> Self {
        self.apply(|c| c.set_resize(width, height))
    }

    /// Build the configuration, returning the first validation failure.
    pub fn build(self) -> Result<RenderConfig> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = RenderConfig::default();
        assert_eq!(c.border(), BorderInsets::uniform(10));
        assert_eq!(c.border_fill(), &Color::black());
        assert!(c.label().enabled);
        assert_eq!(c.label().source, LabelSource::Mode(LabelMode::LatinLower));
        assert_eq!(c.label().badge_size, Size2 { width: 40, height: 40 });
        assert!(!c.axes().enabled);
        assert_eq!(c.axes().length, 60);
        assert_eq!(c.font_family(), "Arial");
        assert_eq!(c.layout().spacing, 10);
    }

    #[test]
    fn scalar_border_broadcasts() {
        let c = RenderConfig::builder().border(10u32).build().unwrap();
        assert_eq!(c.border(), BorderInsets::from([10, 10, 10, 10]));
    }

    #[test]
    fn three_value_border_rejected() {
        let err = RenderConfig::builder()
            .border(&[1u32, 2, 3][..])
            .build()
            .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidConfig(_)));
    }

    #[test]
    fn none_border_is_zero() {
        let mut c = RenderConfig::default();
        c.set_border(None::<&[u32]>).unwrap();
        assert!(c.border().is_zero());
    }

    #[test]
    fn colour_setters_validate() {
        let mut c = RenderConfig::default();
        c.set_badge_fill("navy").unwrap();
        c.set_label_color([1u8, 2, 3]).unwrap();
        c.set_border_fill(&[255i64, 0, 0][..]).unwrap();
        assert_eq!(c.border_fill(), &Color::Rgb(255, 0, 0));
        assert!(c.set_background("not-a-colour").is_err());
        assert!(c.set_axis_color(&[1i64, 2][..]).is_err());
        // Failed assignment leaves the previous value.
        assert_eq!(c.layout().background, Color::white());
    }

    #[test]
    fn badge_size_needs_pair() {
        let mut c = RenderConfig::default();
        assert!(c.set_badge_size(&[30u32][..]).is_err());
        c.set_badge_size((30u32, 20u32)).unwrap();
        assert_eq!(c.label().badge_size, Size2 { width: 30, height: 20 });
    }

    #[test]
    fn first_builder_error_wins() {
        let err = RenderConfig::builder()
            .layout_name("diagonal")
            .axis_length(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidLayout { .. }));
    }

    #[test]
    fn label_source_resolution() {
        assert_eq!(LabelSource::parse("roman"), LabelSource::Mode(LabelMode::Roman));
        assert_eq!(LabelSource::parse("Fig."), LabelSource::Fixed("Fig.".into()));

        let fixed = LabelSource::Fixed("A".into());
        assert_eq!(fixed.resolve(7).unwrap().as_deref(), Some("A"));

        let list = LabelSource::PerImage(vec!["x".into(), "".into()]);
        assert_eq!(list.resolve(0).unwrap().as_deref(), Some("x"));
        assert_eq!(list.resolve(1).unwrap(), None);
        assert!(matches!(
            list.resolve(2),
            Err(ComposeError::IndexOutOfRange { index: 2, len: 2, .. })
        ));

        assert_eq!(LabelSource::None.resolve(0).unwrap(), None);
    }

    #[test]
    fn disabled_label_resolves_to_none() {
        let c = RenderConfig::builder().label(false).build().unwrap();
        assert_eq!(c.resolve_label(0).unwrap(), None);
    }

    #[test]
    fn axis_label_resolution() {
        let mut c = RenderConfig::default();
        assert_eq!(c.resolve_axis_labels(0).unwrap(), None);
        c.set_axes_enabled(true);
        assert_eq!(
            c.resolve_axis_labels(3).unwrap(),
            Some(("X".to_string(), "Y".to_string()))
        );
        c.set_axis_labels(AxisLabels::PerImage {
            x: vec!["t".into(), "u".into()],
            y: vec!["v".into()],
        });
        assert_eq!(
            c.resolve_axis_labels(0).unwrap(),
            Some(("t".to_string(), "v".to_string()))
        );
        assert!(c.resolve_axis_labels(1).is_err());
    }

    #[test]
    fn unknown_font_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = RenderConfig::builder().fonts_dir(tmp.path()).build().unwrap();
        c.set_font_family("NoSuchFamily-3b7e91");
        assert_eq!(c.font_family(), DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn font_found_in_fonts_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("Custom.ttf"), b"stub").unwrap();
        let c = RenderConfig::builder()
            .fonts_dir(tmp.path())
            .font_family("Custom")
            .build()
            .unwrap();
        assert_eq!(c.font_family(), "Custom");
    }

    #[test]
    fn json_round_trip_and_validation() {
        let c = RenderConfig::from_json(
            r#"{"border": [1, 2, 3, 4], "label": {"source": ["a", "b"]}, "layout": {"mode": "grid", "cols": 2}}"#,
        )
        .unwrap();
        assert_eq!(c.border(), BorderInsets::from([1, 2, 3, 4]));
        assert_eq!(c.layout().mode, LayoutMode::Grid);
        assert_eq!(
            c.label().source,
            LabelSource::PerImage(vec!["a".into(), "b".into()])
        );

        assert!(RenderConfig::from_json(r#"{"border": [1, 2, 3]}"#).is_err());
        assert!(RenderConfig::from_json(r#"{"label": {"source": 5}}"#).is_err());
        assert!(RenderConfig::from_json(r#"{"axes": {"length": 0}}"#).is_err());
        assert!(RenderConfig::from_json(r#"{"layout": {"mode": "diagonal"}}"#).is_err());
    }

    #[test]
    fn json_font_family_falls_back() {
        let c = RenderConfig::from_json(r#"{"font_family": "NoSuchFamily-zz9"}"#).unwrap();
        assert_eq!(c.font_family(), DEFAULT_FONT_FAMILY);

        let c: RenderConfig = serde_json::from_str(r#"{"font_family": "NoSuchFamily-zz9"}"#).unwrap();
        assert_eq!(c.font_family(), DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn json_font_family_resolved_against_fonts_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("Custom.ttf"), b"stub").unwrap();
        let json = serde_json::json!({
            "font_family": "Custom",
            "fonts_dir": tmp.path(),
        })
        .to_string();
        let c = RenderConfig::from_json(&json).unwrap();
        assert_eq!(c.font_family(), "Custom");

        let back = RenderConfig::from_json(&serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(back, c);
    }
}
