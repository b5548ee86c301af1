//! The ordered collection of source images a design is built from.

use crate::error::{ComposeError, Result};
use crate::pipeline::input;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Ordered RGB images. Order decides label indices and layout position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSet {
    images: Vec<RgbImage>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every PNG/JPEG in `dir`; see [`crate::pipeline::input`] for order.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            images: input::load_images(dir.as_ref())?,
        })
    }

    /// Take already-decoded images, converting each to RGB.
    pub fn from_images<I>(images: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DynamicImage>,
    {
        Self {
            images: images.into_iter().map(|img| img.into().to_rgb8()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&RgbImage> {
        self.images.get(index).ok_or(self.out_of_range(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RgbImage> {
        self.images.iter()
    }

    pub fn as_slice(&self) -> &[RgbImage] {
        &self.images
    }

    pub fn push(&mut self, img: impl Into<DynamicImage>) {
        self.images.push(img.into().to_rgb8());
    }

    /// Swap the image at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, img: impl Into<DynamicImage>) -> Result<RgbImage> {
        let err = self.out_of_range(index);
        let slot = self.images.get_mut(index).ok_or(err)?;
        Ok(std::mem::replace(slot, img.into().to_rgb8()))
    }

    pub fn remove(&mut self, index: usize) -> Result<RgbImage> {
        if index >= self.images.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.images.remove(index))
    }

    /// `(width, height)` of every image, in order.
    pub fn sizes(&self) -> Vec<(u32, u32)> {
        self.images.iter().map(|img| img.dimensions()).collect()
    }

    fn out_of_range(&self, index: usize) -> ComposeError {
        ComposeError::IndexOutOfRange {
            what: "image",
            index,
            len: self.images.len(),
        }
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a RgbImage;
    type IntoIter = std::slice::Iter<'a, RgbImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

impl From<Vec<RgbImage>> for ImageSet {
    fn from(images: Vec<RgbImage>) -> Self {
        Self { images }
    }
}
