//! In-memory 1-bit page buffer and PNG output.

use std::convert::Infallible;
use std::path::Path;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use image::{GrayImage, Luma};
use inkboard_common::colors::{PAPER, luma};

use crate::error::OutputError;

/// Page-sized pixel buffer, initially blank paper.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<BinaryColor>,
}

impl Framebuffer {
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self { width, height, pixels: vec![PAPER; width as usize * height as usize] }
    }

    #[inline]
    fn index(
        &self,
        x: u32,
        y: u32,
    ) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, `None` outside the page.
    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Option<BinaryColor> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Number of pixels that are not paper.
    pub fn ink_count(&self) -> usize { self.pixels.iter().filter(|&&p| p != PAPER).count() }

    /// Grayscale copy of the page.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.pixel(x, y).map_or(luma(PAPER), luma)])
        })
    }

    /// Encode the page as PNG at `path`.
    pub fn save_png(
        &self,
        path: &Path,
    ) -> Result<(), OutputError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| OutputError::Encode { path: path.to_owned(), source })
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else { continue };
            if let Some(i) = self.index(x, y) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
