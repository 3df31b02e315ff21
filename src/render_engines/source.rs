//! Readable source images
//!
//! The engine only needs the size of the source and one straight RGBA pixel
//! at a time, in 16-bit channels.

use std::ops::Deref;

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel, Rgba};

use crate::color_space::{expand, Depth};

/// An image the engine can sample
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// Straight RGBA at `(x, y)`, 16 bits per channel
    fn rgba16(&self, x: u32, y: u32) -> [u16; 4];
}

impl<P, C> PixelSource for ImageBuffer<P, C>
where
    P: Pixel,
    P::Subpixel: Depth,
    C: Deref<Target = [P::Subpixel]>,
{
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    #[inline]
    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        let Rgba(channels) = self.get_pixel(x, y).to_rgba();
        channels.map(Depth::to_u16)
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        match self {
            DynamicImage::ImageLuma8(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageLumaA8(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageRgb8(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageRgba8(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageLuma16(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageLumaA16(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageRgb16(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageRgba16(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageRgb32F(buffer) => float_to_rgba16(buffer.get_pixel(x, y).to_rgba()),
            DynamicImage::ImageRgba32F(buffer) => float_to_rgba16(*buffer.get_pixel(x, y)),
            other => GenericImageView::get_pixel(other, x, y).0.map(expand),
        }
    }
}

fn float_to_rgba16(Rgba(channels): Rgba<f32>) -> [u16; 4] {
    channels.map(|v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
}
