//! Optional per-image resize.

use crate::config::ResizeSpec;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::borrow::Cow;

/// Target size for an image of `(w, h)` under `spec`, or `None` for no-op.
///
/// A single dimension keeps the aspect ratio (the derived side is truncated
/// and never below 1); both dimensions stretch exactly.
pub fn target_size((w, h): (u32, u32), spec: ResizeSpec) -> Option<(u32, u32)> {
    let scaled = |num: u32, den: u32, side: u32| -> u32 {
        ((side as u64 * num as u64) / den.max(1) as u64).max(1) as u32
    };
    match (spec.width, spec.height) {
        (None, None) => None,
        (Some(tw), Some(th)) => Some((tw, th)),
        (Some(tw), None) => Some((tw, scaled(tw, w, h))),
        (None, Some(th)) => Some((scaled(th, h, w), th)),
    }
}

/// Resize with Lanczos3. Returns the input itself when `spec` is a no-op or
/// already matches.
pub fn resize(img: &RgbImage, spec: ResizeSpec) -> Cow<'_, RgbImage> {
    match target_size(img.dimensions(), spec) {
        Some((tw, th)) if (tw, th) != img.dimensions() => {
            Cow::Owned(imageops::resize(img, tw, th, FilterType::Lanczos3))
        }
        _ => Cow::Borrowed(img),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn spec(width: Option<u32>, height: Option<u32>) -> ResizeSpec {
        ResizeSpec { width, height }
    }

    #[test]
    fn proportional_sizes() {
        assert_eq!(target_size((200, 100), spec(Some(100), None)), Some((100, 50)));
        assert_eq!(target_size((200, 100), spec(None, Some(25))), Some((50, 25)));
        assert_eq!(target_size((300, 100), spec(Some(100), None)), Some((100, 33)));
        assert_eq!(target_size((200, 100), spec(Some(30), Some(90))), Some((30, 90)));
        assert_eq!(target_size((200, 100), spec(None, None)), None);
        assert_eq!(target_size((1000, 1), spec(Some(10), None)), Some((10, 1)));
    }

    #[test]
    fn noop_borrows() {
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        assert!(matches!(resize(&img, spec(None, None)), Cow::Borrowed(_)));
        assert!(matches!(resize(&img, spec(Some(4), None)), Cow::Borrowed(_)));
    }

    #[test]
    fn stretch_changes_dimensions() {
        let img = RgbImage::from_pixel(40, 20, Rgb([200, 0, 0]));
        let out = resize(&img, spec(Some(10), Some(30)));
        assert_eq!(out.dimensions(), (10, 30));
    }
}
