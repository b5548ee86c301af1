//! Error types for the figure-composer library.
//!
//! Every failure the engine can raise is a variant of [`ComposeError`]. All of
//! them are raised before any output artifact is touched: validation happens
//! when a configuration field is assigned, index checks happen when a label or
//! image is looked up, and file writes are atomic (see [`crate::export`]).
//!
//! Font loading is the one non-fatal condition and never appears here: a
//! family that cannot be resolved falls back to the default (or to the
//! built-in bitmap font) with a `tracing::warn!`.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the figure-composer library.
#[derive(Debug, Error)]
pub enum ComposeError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// A configuration value has the wrong type or shape.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Label mode name is not one of the known modes.
    #[error("Invalid label mode '{value}'. Expected one of: {expected}")]
    InvalidMode { value: String, expected: String },

    /// Corner name is not one of the four badge positions.
    #[error("Invalid label position '{value}'. Expected one of: {expected}")]
    InvalidPosition { value: String, expected: String },

    /// Layout name is not row, column or grid.
    #[error("Invalid layout '{value}'. Expected one of: {expected}")]
    InvalidLayout { value: String, expected: String },

    // ── Index errors ──────────────────────────────────────────────────────
    /// The label alphabet has no symbol for this index.
    #[error("Label index {index} is out of range for mode '{mode}' (max {limit})")]
    LabelOutOfRange {
        index: usize,
        mode: &'static str,
        limit: usize,
    },

    /// An image index or per-image label list index is past the end.
    #[error("{what} index {index} is out of range (have {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Composition attempted over zero images.
    #[error("No images to compose")]
    EmptyInput,

    // ── Input errors ──────────────────────────────────────────────────────
    /// Image directory does not exist or is not a directory.
    #[error("Image directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// An image file exists but could not be decoded.
    #[error("Failed to load image '{path}': {source}")]
    ImageLoadFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// PNG/JPEG encoding of a rendered image failed.
    #[error("Image encoding failed: {detail}")]
    EncodeFailed { detail: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::convert::Infallible> for ComposeError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = ComposeError> = std::result::Result<T, E>;
