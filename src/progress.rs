//! Progress-callback trait for per-image render events.
//!
//! Attach an [`Arc<dyn RenderProgressCallback>`] to a
//! [`crate::RasterBackend`] or [`crate::DiagramBackend`] (or to a
//! [`crate::Design`], which hands it to the backends it creates) to receive
//! events as each image is decorated or turned into diagram cells.
//!
//! # Example
//!
//! ```rust
//! use figure_composer::{RenderProgressCallback, RasterBackend};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl RenderProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize) {
//!         let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("Image {}/{} done ({} so far)", index + 1, total, done);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let backend = RasterBackend::new().with_progress(counter);
//! ```

use std::sync::Arc;

/// Called by the backends as they process each image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Rendering is single-threaded and events arrive in
/// image order, but the trait is `Send + Sync` so one callback can be shared
/// by renders running on different threads.
pub trait RenderProgressCallback: Send + Sync {
    /// Called once, after validation and before any image is processed.
    ///
    /// # Arguments
    /// * `total`: number of images that will be processed
    fn on_render_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before an image is decorated.
    ///
    /// # Arguments
    /// * `index`: 0-based image index
    /// * `total`: total images
    fn on_image_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when an image is finished.
    fn on_image_complete(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called once after the composite or diagram is assembled.
    fn on_render_complete(&self, total: usize) {
        let _ = total;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenderProgressCallback for NoopProgressCallback {}

/// Shared callback handle stored by the backends.
pub type ProgressCallback = Arc<dyn RenderProgressCallback>;
