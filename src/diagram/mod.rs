//! draw.io (`.drawio`) output.
//!
//! ```text
//! mxfile ─▶ diagram ─▶ mxGraphModel ─▶ root
//!   cell "0"
//!   └─ cell "1" (layer)
//!      └─ group            "E__…-group"      at (30, 30)
//!         ├─ image         "E__…-1"          data:image/png,<base64>
//!         │  ├─ label      "E__…-numbering"  badge
//!         │  └─ axisgroup  "E__…-axisgroup"
//!         │     ├─ xaxis / yaxis             edges with blockThin arrows
//!         │     └─ xlabel / ylabel           text cells
//!         └─ image         "E__…-2"
//! ```
//!
//! [`build`] creates the cell tree, [`serialize`] writes it out.

pub mod build;
pub mod ids;
pub mod serialize;
pub mod tree;

pub use build::{DiagramBackend, DEFAULT_HOST, DEFAULT_PAGE_NAME};
pub use ids::IdStrategy;
pub use tree::{Cell, CellKind, DiagramDocument, Geometry};
