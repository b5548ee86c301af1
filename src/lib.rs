//! # figure-composer
//!
//! Compose multi-panel scientific figures from a set of images.
//!
//! Each image gets an optional resize, a coloured border, an ordinal badge
//! ("a", "B", "IV", "б", …) in one corner and optional X/Y axis arrows. The
//! decorated images are then laid out in a row, a column or a grid and
//! written either as one bitmap or as an editable draw.io diagram whose cells
//! line up exactly with the bitmap.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ImageSet + RenderConfig
//!  │
//!  ├─ 1. Input     load *.png / *.jpg / *.jpeg, convert to RGB
//!  ├─ 2. Resize    optional, Lanczos3
//!  ├─ 3. Annotate  resolve every label and axis label up front
//!  ├─ 4. Layout    row / column / grid over bordered footprints
//!  └─ 5. Backend
//!       ├─ raster   border → badge → axes → composite → PNG/JPEG
//!       └─ diagram  image/label/axis cells → .drawio XML
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use figure_composer::{export_raster, Design, LayoutMode, RenderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RenderConfig::builder()
//!     .border(4u32)
//!     .label_source("latin_upper")
//!     .layout(LayoutMode::Grid)
//!     .build()?;
//! let design = Design::from_dir("panels/", config)?;
//! let summary = export_raster(&design, "figure.png")?;
//! eprintln!("{}x{} in {}ms", summary.width, summary.height, summary.duration_ms);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `figcomp` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! figure-composer = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod annotate;
pub mod color;
pub mod config;
pub mod design;
pub mod diagram;
pub mod error;
pub mod export;
pub mod geometry;
pub mod image_set;
pub mod label;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod raster;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use color::Color;
pub use config::{
    AxisConfig, AxisLabels, LabelConfig, LabelSource, RenderConfig, RenderConfigBuilder, ResizeSpec,
    DEFAULT_FONT_FAMILY,
};
pub use design::{Design, Renderer};
pub use diagram::{DiagramBackend, DiagramDocument, IdStrategy};
pub use error::{ComposeError, Result};
pub use export::{export_diagram, export_diagram_image, export_raster, export_raster_image};
pub use geometry::{label_rect, BorderInsets, Corner, Rect, Size2};
pub use image_set::ImageSet;
pub use label::{format_label, to_roman, LabelMode};
pub use layout::{plan_layout, LayoutMode, LayoutOptions, LayoutPlan};
pub use output::{OutputKind, RenderSummary};
pub use pipeline::input::load_images;
pub use progress::{NoopProgressCallback, ProgressCallback, RenderProgressCallback};
pub use raster::{RasterBackend, RasterOutput};
