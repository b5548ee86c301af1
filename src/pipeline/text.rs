//! Text measurement and drawing for badges and axis labels.
//!
//! A [`FontFace`] is either an outline font resolved by `font-locate` and
//! rasterised with `ab_glyph`, or the built-in Spleen 12×24 bitmap font used
//! when no outline font can be loaded. Font problems are never fatal.

use ab_glyph::{point, Font, FontArc, FontVec, ScaleFont};
use image::{Rgb, RgbImage};
use spleen_font::{PSF2Font, FONT_12X24};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::DEFAULT_FONT_FAMILY;

const BITMAP_CELL_W: usize = 12;
const BITMAP_CELL_H: usize = 24;

#[derive(Clone)]
pub enum FontFace {
    Outline(FontArc),
    Bitmap,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontFace::Outline(_) => f.write_str("FontFace::Outline"),
            FontFace::Bitmap => f.write_str("FontFace::Bitmap"),
        }
    }
}

impl FontFace {
    /// Resolve `family`, falling back to the default family and then to the
    /// bitmap font, warning at each step.
    pub fn load(family: &str, dir: Option<&Path>) -> FontFace {
        if let Some(face) = Self::try_outline(family, dir) {
            return face;
        }
        if family != DEFAULT_FONT_FAMILY {
            if let Some(face) = Self::try_outline(DEFAULT_FONT_FAMILY, dir) {
                return face;
            }
        }
        warn!("No outline font available; using built-in bitmap font");
        FontFace::Bitmap
    }

    fn try_outline(family: &str, dir: Option<&Path>) -> Option<FontFace> {
        let found = match font_locate::locate(family, dir) {
            Ok(found) => found,
            Err(e) => {
                warn!("Font '{}' unavailable: {}", family, e);
                return None;
            }
        };
        match FontVec::try_from_vec_and_index(found.data, found.index) {
            Ok(font) => {
                debug!("Using font '{}' from {:?}", family, found.source);
                Some(FontFace::Outline(FontArc::new(font)))
            }
            Err(e) => {
                warn!("Font '{}' could not be parsed: {}", family, e);
                None
            }
        }
    }

    /// Rendered `(width, height)` of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: u32) -> (u32, u32) {
        match self {
            FontFace::Outline(font) => {
                let scaled = font.as_scaled(px as f32);
                let width: f32 = text
                    .chars()
                    .map(|ch| scaled.h_advance(font.glyph_id(ch)))
                    .sum();
                let height = (scaled.ascent() - scaled.descent()).ceil();
                (width.ceil() as u32, height.max(0.0) as u32)
            }
            FontFace::Bitmap => {
                let (cw, ch) = bitmap_cell(px);
                (cw * text.chars().count() as u32, ch)
            }
        }
    }

    /// Draw `text` with its bounding box's top-left at `(x, y)`. Pixels
    /// outside the image are clipped.
    pub fn draw(&self, img: &mut RgbImage, x: i32, y: i32, text: &str, px: u32, color: Rgb<u8>) {
        match self {
            FontFace::Outline(font) => draw_outline(font, img, x, y, text, px, color),
            FontFace::Bitmap => draw_bitmap(img, x, y, text, px, color),
        }
    }
}

fn draw_outline(font: &FontArc, img: &mut RgbImage, x: i32, y: i32, text: &str, px: u32, color: Rgb<u8>) {
    let scale = px as f32;
    let scaled = font.as_scaled(scale);
    let baseline = y as f32 + scaled.ascent();
    let mut caret = x as f32;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let tx = gx as i32 + bounds.min.x as i32;
                let ty = gy as i32 + bounds.min.y as i32;
                blend(img, tx, ty, color, coverage);
            });
        }
    }
}

fn draw_bitmap(img: &mut RgbImage, x: i32, y: i32, text: &str, px: u32, color: Rgb<u8>) {
    let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
        warn!("Built-in bitmap font failed to load; text skipped");
        return;
    };
    let (cw, chh) = bitmap_cell(px);

    for (i, ch) in text.chars().enumerate() {
        let mut cell = vec![false; BITMAP_CELL_W * BITMAP_CELL_H];
        let utf8 = ch.to_string();
        match spleen.glyph_for_utf8(utf8.as_bytes()) {
            Some(glyph) => {
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        let idx = row_y * BITMAP_CELL_W + col_x;
                        if idx < cell.len() {
                            cell[idx] = on;
                        }
                    }
                }
            }
            None => draw_box(&mut cell),
        }

        let origin_x = x + (i as u32 * cw) as i32;
        for dy in 0..chh {
            let sy = dy as usize * BITMAP_CELL_H / chh as usize;
            for dx in 0..cw {
                let sx = dx as usize * BITMAP_CELL_W / cw as usize;
                if cell[sy * BITMAP_CELL_W + sx] {
                    blend(img, origin_x + dx as i32, y + dy as i32, color, 1.0);
                }
            }
        }
    }
}

/// Scaled bitmap cell: height follows `px`, width keeps the 1:2 ratio.
fn bitmap_cell(px: u32) -> (u32, u32) {
    let h = px.max(1);
    let w = (h * BITMAP_CELL_W as u32 / BITMAP_CELL_H as u32).max(1);
    (w, h)
}

// Placeholder for characters the bitmap font lacks.
fn draw_box(cell: &mut [bool]) {
    for y in 2..BITMAP_CELL_H - 2 {
        for x in 1..BITMAP_CELL_W - 1 {
            if y == 2 || y == BITMAP_CELL_H - 3 || x == 1 || x == BITMAP_CELL_W - 2 {
                cell[y * BITMAP_CELL_W + x] = true;
            }
        }
    }
}

fn blend(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let a = coverage.clamp(0.0, 1.0);
    let dst = img.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let mixed = dst.0[c] as f32 * (1.0 - a) + color.0[c] as f32 * a;
        dst.0[c] = mixed.round() as u8;
    }
}
