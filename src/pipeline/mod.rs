//! Pipeline stages for figure composition.
//!
//! Each submodule implements exactly one transformation step. The raster
//! backend runs all of them; the diagram backend runs only `input`, `resize`
//! and `encode` and expresses the rest as diagram cells.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ resize ──▶ decorate ──▶ composite ──▶ encode
//! (dir/vec)  (Lanczos)  (border,     (row/column/  (PNG, base64)
//!                        badge, axes) grid canvas)
//! ```
//!
//! 1. [`input`]: decode PNG/JPEG files from a directory into RGB buffers
//! 2. [`resize`]: optional proportional or exact resize
//! 3. [`decorate`]: border expansion, then label badge, then axis overlay.
//!    The border moves the origin used by the later steps.
//! 4. [`composite`]: paste decorated images onto one canvas per the layout plan
//! 5. [`encode`]: PNG/JPEG bytes and base64 payloads
//!
//! [`text`] provides the font handle shared by badge and axis drawing.

pub mod composite;
pub mod decorate;
pub mod encode;
pub mod input;
pub mod resize;
pub mod text;
