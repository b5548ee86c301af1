//! Per-image decoration: border expansion, label badge and axis overlay.
//!
//! Steps run in this order on one image. The badge and axes are positioned on
//! the bordered image, so the border always comes first.

use crate::color::Color;
use crate::config::{AxisConfig, LabelConfig};
use crate::geometry::{axis_geometry, label_rect, AxisGeometry, BorderInsets, Point};
use crate::pipeline::text::FontFace;
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point as PolyPoint;
use imageproc::rect::Rect as FillRect;
use std::borrow::Cow;

/// Grow the canvas by `insets`, filling the new area with `fill`.
///
/// A zero border returns the input unchanged.
pub fn expand_border<'a>(img: Cow<'a, RgbImage>, insets: BorderInsets, fill: &Color) -> Cow<'a, RgbImage> {
    if insets.is_zero() {
        return img;
    }
    let (w, h) = img.dimensions();
    let mut out = RgbImage::from_pixel(w + insets.horizontal(), h + insets.vertical(), fill.to_rgb());
    imageops::replace(&mut out, &*img, insets.left as i64, insets.top as i64);
    Cow::Owned(out)
}

/// Draw the filled badge at its corner and centre `text` inside it.
pub fn draw_badge(img: &mut RgbImage, text: &str, insets: BorderInsets, label: &LabelConfig, font: &FontFace) {
    let (w, h) = img.dimensions();
    let rect = label_rect(w, h, insets, label.corner, label.badge_size);
    fill_rect(img, rect.x0, rect.y0, rect.width(), rect.height(), label.badge_fill.to_rgb());

    let (tw, th) = font.measure(text, label.font_size);
    let cx = rect.x0 + (rect.width() as i32 - tw as i32).div_euclid(2);
    let cy = rect.y0 + (rect.height() as i32 - th as i32).div_euclid(2);
    font.draw(img, cx, cy, text, label.font_size, label.text_color.to_rgb());
}

/// Draw both arrows from the bottom-left origin with their labels.
pub fn draw_axes(img: &mut RgbImage, labels: (&str, &str), axes: &AxisConfig, font: &FontFace) {
    let geom = axis_geometry(img.height(), axes.offset, axes.length, axes.stroke_width);
    let color = axes.color.to_rgb();
    draw_arrows(img, &geom, color);

    let (lx, ly) = labels;
    let (ax, ay) = geom.x_label_anchor(axes.font_size);
    font.draw(img, ax as i32, ay as i32, lx, axes.font_size, color);
    let (bx, by) = geom.y_label_anchor(axes.font_size);
    font.draw(img, bx as i32, by as i32, ly, axes.font_size, color);
}

fn draw_arrows(img: &mut RgbImage, geom: &AxisGeometry, color: Rgb<u8>) {
    let w = geom.stroke_width as i32;
    let (x0, y0) = (geom.origin.0 as i32, geom.origin.1 as i32);

    // Shafts are centred on the axis line and meet the arrowhead bases.
    let (left, top) = (x0 - w / 2, y0 - w / 2);
    let x_end = geom.x_shaft_end.0.round() as i32;
    fill_rect(img, left, top, (x_end - left).max(0) as u32, w as u32, color);
    let y_end = geom.y_shaft_end.1.round() as i32;
    fill_rect(img, left, y_end, w as u32, (top + w - y_end).max(0) as u32, color);

    fill_triangle(img, &geom.x_arrow, color);
    fill_triangle(img, &geom.y_arrow, color);
}

fn fill_rect(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    draw_filled_rect_mut(img, FillRect::at(x, y).of_size(w, h), color);
}

fn fill_triangle(img: &mut RgbImage, pts: &[Point; 3], color: Rgb<u8>) {
    let poly: Vec<PolyPoint<i32>> = pts
        .iter()
        .map(|&(x, y)| PolyPoint::new(x.round() as i32, y.round() as i32))
        .collect();
    // Degenerate at stroke width 0.
    if poly[0] == poly[poly.len() - 1] || poly[0] == poly[1] {
        return;
    }
    draw_polygon_mut(img, &poly, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Corner, Size2};

    fn base(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    #[test]
    fn border_grows_canvas() {
        let img = base(100, 50);
        let out = expand_border(Cow::Borrowed(&img), BorderInsets::from([5, 6, 7, 8]), &Color::black());
        assert_eq!(out.dimensions(), (112, 64));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(111, 63), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(5, 6), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(104, 55), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(105, 56), &Rgb([0, 0, 0]));
    }

    #[test]
    fn zero_border_is_identity() {
        let img = base(10, 10);
        let out = expand_border(Cow::Borrowed(&img), BorderInsets::ZERO, &Color::black());
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn badge_fills_its_corner() {
        let mut img = base(120, 120);
        let label = LabelConfig {
            corner: Corner::BottomRight,
            badge_size: Size2::try_from((30u32, 20u32)).unwrap(),
            badge_fill: Color::Rgb(0, 0, 255),
            ..LabelConfig::default()
        };
        draw_badge(&mut img, "", BorderInsets::uniform(10), &label, &FontFace::Bitmap);
        // Badge spans x 80..110, y 90..110.
        assert_eq!(img.get_pixel(80, 90), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(109, 109), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(110, 109), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(79, 90), &Rgb([255, 255, 255]));
    }

    #[test]
    fn badge_text_stays_inside() {
        let mut img = base(100, 100);
        let label = LabelConfig::default();
        draw_badge(&mut img, "a", BorderInsets::ZERO, &label, &FontFace::Bitmap);
        // White glyph pixels appear inside the black 40×40 badge only.
        let white_inside = (0..40)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| img.get_pixel(x, y) == &Rgb([255, 255, 255]))
            .count();
        assert!(white_inside > 0);
        assert_eq!(img.get_pixel(45, 45), &Rgb([255, 255, 255]));
    }

    #[test]
    fn axes_draw_shafts_and_tips() {
        let mut img = base(200, 200);
        let axes = AxisConfig {
            enabled: true,
            color: Color::Rgb(255, 0, 0),
            ..AxisConfig::default()
        };
        draw_axes(&mut img, ("", ""), &axes, &FontFace::Bitmap);
        let red = Rgb([255, 0, 0]);
        // Origin at (20, 180); length 60.
        assert_eq!(img.get_pixel(20, 180), &red);
        assert_eq!(img.get_pixel(50, 180), &red);
        assert_eq!(img.get_pixel(20, 150), &red);
        // Arrowheads reach close to the tips.
        assert_eq!(img.get_pixel(77, 180), &red);
        assert_eq!(img.get_pixel(20, 123), &red);
        assert_eq!(img.get_pixel(150, 50), &Rgb([255, 255, 255]));
    }
}
