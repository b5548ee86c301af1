//! Layout planning: where each decorated image goes on the canvas.
//!
//! [`plan_layout`] is the single layout algorithm; the raster compositor
//! pastes pixels at its offsets and the diagram builder positions image cells
//! at the same offsets, so both outputs line up exactly.

use crate::color::Color;
use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How images are packed onto the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Left to right, top-aligned.
    #[default]
    Row,
    /// Top to bottom, left-aligned.
    Column,
    /// Uniform cells sized to the largest image, filled row by row.
    Grid,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 3] = [LayoutMode::Row, LayoutMode::Column, LayoutMode::Grid];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Row => "row",
            LayoutMode::Column => "column",
            LayoutMode::Grid => "grid",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| ComposeError::InvalidLayout {
                value: s.to_string(),
                expected: Self::ALL.map(LayoutMode::as_str).join(", "),
            })
    }
}

/// Canvas-level layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub mode: LayoutMode,
    /// Gap between neighbouring images, in pixels. Default: 10.
    pub spacing: u32,
    /// Canvas fill behind and between images. Default: white.
    pub background: Color,
    /// Grid columns; derived when `None`.
    pub cols: Option<u32>,
    /// Grid rows; derived when `None`.
    pub rows: Option<u32>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Row,
            spacing: 10,
            background: Color::white(),
            cols: None,
            rows: None,
        }
    }
}

/// Resolved grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    pub cols: u32,
    pub rows: u32,
}

/// One offset per image plus the canvas size that holds them all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub mode: LayoutMode,
    pub positions: Vec<(u32, u32)>,
    pub width: u32,
    pub height: u32,
    /// Only set for [`LayoutMode::Grid`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridShape>,
}

/// Resolve grid columns and rows for `n` images.
///
/// With neither given the grid is as square as possible. When both are given
/// but `cols × rows < n`, rows grow to `ceil(n / cols)` so every image gets a
/// cell.
pub fn grid_shape(n: usize, cols: Option<u32>, rows: Option<u32>) -> Result<GridShape> {
    if cols == Some(0) || rows == Some(0) {
        return Err(ComposeError::InvalidConfig(
            "grid columns and rows must be ≥ 1".into(),
        ));
    }
    let n = n.max(1) as u32;

    let shape = match (cols, rows) {
        (None, None) => {
            let cols = (n as f64).sqrt().ceil() as u32;
            GridShape {
                cols,
                rows: n.div_ceil(cols),
            }
        }
        (Some(cols), None) => GridShape {
            cols,
            rows: n.div_ceil(cols),
        },
        (None, Some(rows)) => GridShape {
            cols: n.div_ceil(rows),
            rows,
        },
        (Some(cols), Some(rows)) => GridShape {
            cols,
            rows: rows.max(n.div_ceil(cols)),
        },
    };
    Ok(shape)
}

/// Plan positions for images of the given `(width, height)` sizes.
///
/// A canvas or offset that does not fit in `u32` is `InvalidConfig`.
pub fn plan_layout(sizes: &[(u32, u32)], opts: &LayoutOptions) -> Result<LayoutPlan> {
    if sizes.is_empty() {
        return Err(ComposeError::EmptyInput);
    }

    let max_w = sizes.iter().map(|s| s.0).max().unwrap_or(0);
    let max_h = sizes.iter().map(|s| s.1).max().unwrap_or(0);

    let plan = match opts.mode {
        LayoutMode::Row => {
            let (xs, width) = stack(sizes.iter().map(|s| s.0), opts.spacing)?;
            LayoutPlan {
                mode: LayoutMode::Row,
                positions: xs.into_iter().map(|x| (x, 0)).collect(),
                width,
                height: max_h,
                grid: None,
            }
        }
        LayoutMode::Column => {
            let (ys, height) = stack(sizes.iter().map(|s| s.1), opts.spacing)?;
            LayoutPlan {
                mode: LayoutMode::Column,
                positions: ys.into_iter().map(|y| (0, y)).collect(),
                width: max_w,
                height,
                grid: None,
            }
        }
        LayoutMode::Grid => {
            let shape = grid_shape(sizes.len(), opts.cols, opts.rows)?;
            let pitch_x = u64::from(max_w) + u64::from(opts.spacing);
            let pitch_y = u64::from(max_h) + u64::from(opts.spacing);
            let positions = (0..sizes.len() as u64)
                .map(|i| {
                    let (row, col) = (i / u64::from(shape.cols), i % u64::from(shape.cols));
                    Ok((fit("grid offset", col * pitch_x)?, fit("grid offset", row * pitch_y)?))
                })
                .collect::<Result<Vec<_>>>()?;
            LayoutPlan {
                mode: LayoutMode::Grid,
                positions,
                width: fit("canvas width", span(shape.cols, max_w, opts.spacing))?,
                height: fit("canvas height", span(shape.rows, max_h, opts.spacing))?,
                grid: Some(shape),
            }
        }
    };
    Ok(plan)
}

/// Start offset of each span laid end to end with `spacing` between, plus
/// the total length.
fn stack(spans: impl Iterator<Item = u32>, spacing: u32) -> Result<(Vec<u32>, u32)> {
    let mut starts = Vec::new();
    let mut offset = 0u64;
    for (i, len) in spans.enumerate() {
        if i > 0 {
            offset += u64::from(spacing);
        }
        starts.push(fit("layout offset", offset)?);
        offset += u64::from(len);
    }
    Ok((starts, fit("canvas size", offset)?))
}

/// `count` cells of `cell` pixels with `spacing` between them.
fn span(count: u32, cell: u32, spacing: u32) -> u64 {
    u64::from(count) * u64::from(cell) + u64::from(spacing) * u64::from(count.saturating_sub(1))
}

fn fit(what: &str, v: u64) -> Result<u32> {
    u32::try_from(v).map_err(|_| {
        ComposeError::InvalidConfig(format!("{what} of {v}px does not fit in a 32-bit canvas"))
    })
}
