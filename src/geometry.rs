//! Badge and axis geometry shared by the raster and diagram backends.
//!
//! Everything here is computed in the coordinate space of one *decorated*
//! image (resized image plus border). The raster backend draws at these
//! coordinates directly; the diagram backend translates them by the border
//! insets into the image cell's local space.

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Border insets ────────────────────────────────────────────────────────

/// Border width on each side, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BorderRepr", into = "BorderRepr")]
pub struct BorderInsets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BorderInsets {
    pub const ZERO: BorderInsets = BorderInsets::uniform(0);

    pub const fn uniform(size: u32) -> Self {
        Self {
            left: size,
            top: size,
            right: size,
            bottom: size,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Largest of the four sides (used as the diagram stroke width).
    pub fn max(&self) -> u32 {
        self.left.max(self.top).max(self.right).max(self.bottom)
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

impl From<u32> for BorderInsets {
    fn from(size: u32) -> Self {
        Self::uniform(size)
    }
}

impl From<[u32; 4]> for BorderInsets {
    fn from([left, top, right, bottom]: [u32; 4]) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl TryFrom<&[u32]> for BorderInsets {
    type Error = ComposeError;

    /// Exactly four values `(left, top, right, bottom)`.
    fn try_from(sides: &[u32]) -> Result<Self> {
        match *sides {
            [left, top, right, bottom] => Ok(Self {
                left,
                top,
                right,
                bottom,
            }),
            _ => Err(ComposeError::InvalidConfig(format!(
                "border size must be an integer or 4 values (left, top, right, bottom), got {} values",
                sides.len()
            ))),
        }
    }
}

impl TryFrom<Option<&[u32]>> for BorderInsets {
    type Error = ComposeError;

    /// `None` means no border.
    fn try_from(sides: Option<&[u32]>) -> Result<Self> {
        sides.map_or(Ok(Self::ZERO), Self::try_from)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BorderRepr {
    Uniform(u32),
    Sides(Vec<u32>),
    None(Option<()>),
}

impl TryFrom<BorderRepr> for BorderInsets {
    type Error = ComposeError;

    fn try_from(repr: BorderRepr) -> Result<Self> {
        match repr {
            BorderRepr::Uniform(n) => Ok(Self::uniform(n)),
            BorderRepr::Sides(v) => Self::try_from(v.as_slice()),
            BorderRepr::None(_) => Ok(Self::ZERO),
        }
    }
}

impl From<BorderInsets> for BorderRepr {
    fn from(b: BorderInsets) -> Self {
        BorderRepr::Sides(vec![b.left, b.top, b.right, b.bottom])
    }
}

// ── Badge corner ─────────────────────────────────────────────────────────

/// Corner of the decorated image that holds the label badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| ComposeError::InvalidPosition {
                value: s.to_string(),
                expected: Self::ALL.map(Corner::as_str).join(", "),
            })
    }
}

// ── Sizes and rectangles ─────────────────────────────────────────────────

/// A strictly positive `(width, height)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Size2 {
    pub width: u32,
    pub height: u32,
}

impl TryFrom<(u32, u32)> for Size2 {
    type Error = ComposeError;

    fn try_from((width, height): (u32, u32)) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ComposeError::InvalidConfig(format!(
                "size must be positive, got ({width}, {height})"
            )));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<&[u32]> for Size2 {
    type Error = ComposeError;

    fn try_from(v: &[u32]) -> Result<Self> {
        match *v {
            [w, h] => Self::try_from((w, h)),
            _ => Err(ComposeError::InvalidConfig(format!(
                "size must be exactly 2 values (width, height), got {}",
                v.len()
            ))),
        }
    }
}

impl TryFrom<Vec<u32>> for Size2 {
    type Error = ComposeError;

    fn try_from(v: Vec<u32>) -> Result<Self> {
        Self::try_from(v.as_slice())
    }
}

impl From<Size2> for Vec<u32> {
    fn from(s: Size2) -> Self {
        vec![s.width, s.height]
    }
}

/// Axis-aligned rectangle `(x0, y0)–(x1, y1)`, exclusive of `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

/// Badge rectangle for an image of `image_w × image_h` (border included),
/// flush against the border inset at `corner`.
pub fn label_rect(
    image_w: u32,
    image_h: u32,
    insets: BorderInsets,
    corner: Corner,
    badge: Size2,
) -> Rect {
    let (w, h) = (image_w as i32, image_h as i32);
    let (bw, bh) = (badge.width as i32, badge.height as i32);
    let (l, t, r, b) = (
        insets.left as i32,
        insets.top as i32,
        insets.right as i32,
        insets.bottom as i32,
    );

    let (x0, y0) = match corner {
        Corner::TopLeft => (l, t),
        Corner::TopRight => (w - r - bw, t),
        Corner::BottomLeft => (l, h - b - bh),
        Corner::BottomRight => (w - r - bw, h - b - bh),
    };

    Rect {
        x0,
        y0,
        x1: x0 + bw,
        y1: y0 + bh,
    }
}

// ── Axes ─────────────────────────────────────────────────────────────────

/// Distance from the bottom-left corner to the axis origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OffsetRepr", into = "OffsetRepr")]
pub struct AxisOffset {
    pub x: u32,
    pub y: u32,
}

impl From<u32> for AxisOffset {
    fn from(v: u32) -> Self {
        Self { x: v, y: v }
    }
}

impl From<(u32, u32)> for AxisOffset {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl TryFrom<&[u32]> for AxisOffset {
    type Error = ComposeError;

    fn try_from(v: &[u32]) -> Result<Self> {
        match *v {
            [n] => Ok(Self::from(n)),
            [x, y] => Ok(Self { x, y }),
            _ => Err(ComposeError::InvalidConfig(format!(
                "axis offset must be an integer or 2 values (x, y), got {} values",
                v.len()
            ))),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OffsetRepr {
    Scalar(u32),
    Pair(Vec<u32>),
}

impl TryFrom<OffsetRepr> for AxisOffset {
    type Error = ComposeError;

    fn try_from(repr: OffsetRepr) -> Result<Self> {
        match repr {
            OffsetRepr::Scalar(n) => Ok(Self::from(n)),
            OffsetRepr::Pair(v) => Self::try_from(v.as_slice()),
        }
    }
}

impl From<AxisOffset> for OffsetRepr {
    fn from(o: AxisOffset) -> Self {
        OffsetRepr::Pair(vec![o.x, o.y])
    }
}

pub type Point = (f32, f32);

/// Resolved axis drawing: two shafts, two arrowheads and the label anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGeometry {
    pub origin: Point,
    /// Arrow tip of the X axis, `length` to the right of the origin.
    pub x_tip: Point,
    /// Arrow tip of the Y axis, `length` above the origin.
    pub y_tip: Point,
    /// Where the X shaft stops and its arrowhead begins.
    pub x_shaft_end: Point,
    pub y_shaft_end: Point,
    pub x_arrow: [Point; 3],
    pub y_arrow: [Point; 3],
    pub stroke_width: u32,
}

/// Arrowhead length relative to stroke width.
pub const ARROW_LENGTH_FACTOR: f32 = 2.5;
/// Arrowhead half-width relative to stroke width.
pub const ARROW_HALF_WIDTH_FACTOR: f32 = 1.2;
/// Gap between an arrow tip and its label.
pub const LABEL_GAP: f32 = 5.0;
/// Average glyph width as a fraction of font size, for text width estimates.
pub const GLYPH_WIDTH_FACTOR: f32 = 0.6;

pub fn axis_geometry(image_h: u32, offset: AxisOffset, length: u32, stroke_width: u32) -> AxisGeometry {
    let arrow_len = stroke_width as f32 * ARROW_LENGTH_FACTOR;
    let half = stroke_width as f32 * ARROW_HALF_WIDTH_FACTOR;
    let len = length as f32;

    let x0 = offset.x as f32;
    let y0 = image_h as f32 - offset.y as f32;

    let end_x = x0 + len - arrow_len;
    let end_y = y0 - len + arrow_len;

    AxisGeometry {
        origin: (x0, y0),
        x_tip: (x0 + len, y0),
        y_tip: (x0, y0 - len),
        x_shaft_end: (end_x, y0),
        y_shaft_end: (x0, end_y),
        x_arrow: [(end_x + arrow_len, y0), (end_x, y0 - half), (end_x, y0 + half)],
        y_arrow: [(x0, end_y - arrow_len), (x0 - half, end_y), (x0 + half, end_y)],
        stroke_width,
    }
}

impl AxisGeometry {
    /// Top-left of the X axis label for `font_size`.
    pub fn x_label_anchor(&self, font_size: u32) -> Point {
        (self.x_tip.0 + LABEL_GAP, self.origin.1 - (font_size / 2) as f32)
    }

    /// Top-left of the Y axis label for `font_size`.
    pub fn y_label_anchor(&self, font_size: u32) -> Point {
        (self.origin.0 + LABEL_GAP, self.y_tip.1 - font_size as f32)
    }
}

/// Estimated rendered width of `text` at `font_size`.
pub fn estimate_text_width(text: &str, font_size: u32) -> f32 {
    text.chars().count() as f32 * font_size as f32 * GLYPH_WIDTH_FACTOR
}
