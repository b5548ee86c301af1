//! Canvas assembly: paste decorated images at their planned offsets.

use crate::error::Result;
use crate::layout::{plan_layout, LayoutOptions, LayoutPlan};
use image::{imageops, RgbImage};
use std::borrow::Borrow;
use tracing::debug;

/// Plan the layout for `images` and paste them onto one background canvas.
pub fn composite<I>(images: &[I], opts: &LayoutOptions) -> Result<(RgbImage, LayoutPlan)>
where
    I: Borrow<RgbImage>,
{
    let sizes: Vec<(u32, u32)> = images
        .iter()
        .map(|img| Borrow::<RgbImage>::borrow(img).dimensions())
        .collect();
    let plan = plan_layout(&sizes, opts)?;
    debug!(
        "Compositing {} images on {}x{} canvas ({})",
        images.len(),
        plan.width,
        plan.height,
        plan.mode
    );

    let mut canvas = RgbImage::from_pixel(plan.width, plan.height, opts.background.to_rgb());
    for (img, &(x, y)) in images.iter().zip(&plan.positions) {
        let top: &RgbImage = img.borrow();
        imageops::replace(&mut canvas, top, x as i64, y as i64);
    }
    Ok((canvas, plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::ComposeError;
    use crate::layout::LayoutMode;
    use image::Rgb;
    use std::borrow::Cow;

    fn solid(w: u32, h: u32, c: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(c))
    }

    #[test]
    fn row_with_gap() {
        let a = solid(100, 100, [255, 0, 0]);
        let b = solid(100, 50, [0, 255, 0]);
        let imgs = [Cow::Borrowed(&a), Cow::Borrowed(&b)];
        let (canvas, plan) = composite(&imgs, &LayoutOptions::default()).unwrap();
        assert_eq!(canvas.dimensions(), (210, 100));
        assert_eq!(plan.positions, vec![(0, 0), (110, 0)]);
        assert_eq!(canvas.get_pixel(50, 50), &Rgb([255, 0, 0]));
        // Spacing and the area under the shorter image stay background.
        assert_eq!(canvas.get_pixel(105, 10), &Rgb([255, 255, 255]));
        assert_eq!(canvas.get_pixel(150, 75), &Rgb([255, 255, 255]));
        assert_eq!(canvas.get_pixel(150, 25), &Rgb([0, 255, 0]));
    }

    #[test]
    fn grid_background() {
        let imgs: Vec<RgbImage> = (0..3).map(|_| solid(10, 10, [0, 0, 0])).collect();
        let refs: Vec<Cow<'_, RgbImage>> = imgs.iter().map(Cow::Borrowed).collect();
        let opts = LayoutOptions {
            mode: LayoutMode::Grid,
            spacing: 0,
            background: Color::Rgb(1, 2, 3),
            ..LayoutOptions::default()
        };
        let (canvas, plan) = composite(&refs, &opts).unwrap();
        assert_eq!(canvas.dimensions(), (20, 20));
        assert_eq!(plan.positions[2], (0, 10));
        assert_eq!(canvas.get_pixel(15, 15), &Rgb([1, 2, 3]));
    }

    #[test]
    fn owned_images_accepted() {
        let imgs = vec![solid(4, 4, [9, 9, 9]), solid(4, 4, [9, 9, 9])];
        let (canvas, _) = composite(&imgs, &LayoutOptions::default()).unwrap();
        assert_eq!(canvas.dimensions(), (18, 4));
    }

    #[test]
    fn empty_is_error() {
        let imgs: Vec<Cow<'_, RgbImage>> = Vec::new();
        let err = composite(&imgs, &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, ComposeError::EmptyInput));
    }
}
