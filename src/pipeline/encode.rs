//! Image encoding: `RgbImage` → PNG/JPEG bytes or a base64 PNG payload.
//!
//! The diagram backend embeds every image as `data:image/png,<base64>` in the
//! cell style, so PNG is always used there. Raster export picks the format
//! from the output path's extension.

use crate::error::{ComposeError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode `img` in the given container format.
pub fn encode(img: &RgbImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|e| ComposeError::EncodeFailed {
            detail: e.to_string(),
        })?;
    Ok(buf)
}

/// Encode as PNG and return standard base64 (with padding).
pub fn encode_png_base64(img: &RgbImage) -> Result<String> {
    let buf = encode(img, ImageFormat::Png)?;
    let b64 = STANDARD.encode(&buf);
    debug!("Encoded {}x{} image → {} bytes base64", img.width(), img.height(), b64.len());
    Ok(b64)
}

/// Output format for a raster path. Unknown or missing extensions fall back
/// to PNG.
pub fn format_for_path(path: &Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        Ok(fmt @ (ImageFormat::Png | ImageFormat::Jpeg)) => fmt,
        _ => ImageFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn encode_small_image() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let b64 = encode_png_base64(&img).expect("encode should succeed");
        let decoded = STANDARD.decode(&b64).expect("valid base64");
        // PNG signature
        assert_eq!(&decoded[..8], b"\x89PNG\r\n\x1a\n");
        let back = image::load_from_memory(&decoded).unwrap().to_rgb8();
        assert_eq!(back.get_pixel(3, 3), &Rgb([255, 0, 0]));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(format_for_path(Path::new("a/out.png")), ImageFormat::Png);
        assert_eq!(format_for_path(Path::new("out.jpg")), ImageFormat::Jpeg);
        assert_eq!(format_for_path(Path::new("out.JPEG")), ImageFormat::Jpeg);
        assert_eq!(format_for_path(Path::new("out")), ImageFormat::Png);
        assert_eq!(format_for_path(Path::new("out.tiff")), ImageFormat::Png);
    }

    #[test]
    fn jpeg_bytes() {
        let img = RgbImage::from_pixel(8, 8, Rgb([0, 0, 255]));
        let bytes = encode(&img, ImageFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
