//! Output pixel formats
//!
//! The resolved format is the smallest buffer type that stores the face and
//! background colors without loss.

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use serde::{Deserialize, Serialize};

use crate::color_space::{needs_16_bits, Color};
use crate::render_engines::composite::GlyphPixel;

/// Destination buffer variants, one per `DynamicImage` layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Gray8,
    Gray16,
    GrayAlpha8,
    GrayAlpha16,
    Rgb8,
    Rgb16,
    Rgba8,
    Rgba16,
}

impl PixelFormat {
    /// Classify the colors that must be stored: all channels equal means a
    /// gray candidate, any non-opaque alpha means an alpha channel, and any
    /// channel that does not survive a round trip through 8 bits means 16-bit
    pub fn classify(colors: &[Color]) -> Self {
        let mut gray = true;
        let mut alpha = false;
        let mut wide = false;

        for color in colors {
            let [r, g, b, a] = color.to_rgba16();
            gray &= r == g && g == b;
            alpha |= a != u16::MAX;
            wide |= [r, g, b, a].into_iter().any(needs_16_bits);
        }

        Self::from_parts(gray, alpha, wide)
    }

    pub fn from_parts(gray: bool, alpha: bool, wide: bool) -> Self {
        match (gray, alpha, wide) {
            (true, false, false) => PixelFormat::Gray8,
            (true, false, true) => PixelFormat::Gray16,
            (true, true, false) => PixelFormat::GrayAlpha8,
            (true, true, true) => PixelFormat::GrayAlpha16,
            (false, false, false) => PixelFormat::Rgb8,
            (false, false, true) => PixelFormat::Rgb16,
            (false, true, false) => PixelFormat::Rgba8,
            (false, true, true) => PixelFormat::Rgba16,
        }
    }

    pub fn is_gray(self) -> bool {
        matches!(
            self,
            PixelFormat::Gray8 | PixelFormat::Gray16 | PixelFormat::GrayAlpha8 | PixelFormat::GrayAlpha16
        )
    }

    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::GrayAlpha8 | PixelFormat::GrayAlpha16 | PixelFormat::Rgba8 | PixelFormat::Rgba16
        )
    }

    pub fn is_16_bit(self) -> bool {
        matches!(
            self,
            PixelFormat::Gray16 | PixelFormat::GrayAlpha16 | PixelFormat::Rgb16 | PixelFormat::Rgba16
        )
    }

    /// Same layout with an alpha channel added
    pub fn with_alpha(self) -> Self {
        Self::from_parts(self.is_gray(), true, self.is_16_bit())
    }

    /// Allocate a destination, optionally pre-filled with a background.
    ///
    /// Without a background every channel, alpha included, starts at zero.
    pub fn create_canvas(self, width: u32, height: u32, background: Option<Color>) -> DynamicImage {
        match self {
            PixelFormat::Gray8 => DynamicImage::ImageLuma8(canvas::<Luma<u8>>(width, height, background)),
            PixelFormat::Gray16 => DynamicImage::ImageLuma16(canvas::<Luma<u16>>(width, height, background)),
            PixelFormat::GrayAlpha8 => {
                DynamicImage::ImageLumaA8(canvas::<LumaA<u8>>(width, height, background))
            }
            PixelFormat::GrayAlpha16 => {
                DynamicImage::ImageLumaA16(canvas::<LumaA<u16>>(width, height, background))
            }
            PixelFormat::Rgb8 => DynamicImage::ImageRgb8(canvas::<Rgb<u8>>(width, height, background)),
            PixelFormat::Rgb16 => DynamicImage::ImageRgb16(canvas::<Rgb<u16>>(width, height, background)),
            PixelFormat::Rgba8 => DynamicImage::ImageRgba8(canvas::<Rgba<u8>>(width, height, background)),
            PixelFormat::Rgba16 => DynamicImage::ImageRgba16(canvas::<Rgba<u16>>(width, height, background)),
        }
    }

    /// Format of an existing destination buffer
    pub fn of(image: &DynamicImage) -> Option<Self> {
        match image {
            DynamicImage::ImageLuma8(_) => Some(PixelFormat::Gray8),
            DynamicImage::ImageLuma16(_) => Some(PixelFormat::Gray16),
            DynamicImage::ImageLumaA8(_) => Some(PixelFormat::GrayAlpha8),
            DynamicImage::ImageLumaA16(_) => Some(PixelFormat::GrayAlpha16),
            DynamicImage::ImageRgb8(_) => Some(PixelFormat::Rgb8),
            DynamicImage::ImageRgb16(_) => Some(PixelFormat::Rgb16),
            DynamicImage::ImageRgba8(_) => Some(PixelFormat::Rgba8),
            DynamicImage::ImageRgba16(_) => Some(PixelFormat::Rgba16),
            _ => None,
        }
    }
}

/// Typed destination buffer, pre-filled with `background` when given
pub(crate) fn canvas<P: GlyphPixel>(
    width: u32,
    height: u32,
    background: Option<Color>,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    match background {
        Some(color) => ImageBuffer::from_pixel(width, height, P::from_color(color)),
        None => ImageBuffer::new(width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_space::{BLACK, WHITE};

    #[test]
    fn test_classify_black_white() {
        assert_eq!(PixelFormat::classify(&[BLACK, WHITE]), PixelFormat::Gray8);
    }

    #[test]
    fn test_classify_by_value_not_variant() {
        // an 8-bit value carried by a 16-bit variant is still 8-bit
        let face = Color::Rgb16([0, 0, 0]);
        let background = Color::Rgba16([0xFFFF; 4]);
        assert_eq!(PixelFormat::classify(&[face, background]), PixelFormat::Gray8);

        let face = Color::Gray16(0x1234);
        assert_eq!(PixelFormat::classify(&[face, WHITE]), PixelFormat::Gray16);
    }

    #[test]
    fn test_classify_color_and_alpha() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(PixelFormat::classify(&[red, WHITE]), PixelFormat::Rgb8);

        let ghost = Color::rgba(0, 0, 0, 0x80);
        assert_eq!(PixelFormat::classify(&[ghost, WHITE]), PixelFormat::GrayAlpha8);
        assert_eq!(PixelFormat::classify(&[ghost, red]), PixelFormat::Rgba8);

        let wide = Color::Rgba16([1, 2, 3, 4]);
        assert_eq!(PixelFormat::classify(&[wide]), PixelFormat::Rgba16);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(PixelFormat::Gray8.with_alpha(), PixelFormat::GrayAlpha8);
        assert_eq!(PixelFormat::Rgb16.with_alpha(), PixelFormat::Rgba16);
        assert_eq!(PixelFormat::Rgba8.with_alpha(), PixelFormat::Rgba8);
    }

    #[test]
    fn test_create_canvas_matches_format() {
        for format in [
            PixelFormat::Gray8,
            PixelFormat::Gray16,
            PixelFormat::GrayAlpha8,
            PixelFormat::GrayAlpha16,
            PixelFormat::Rgb8,
            PixelFormat::Rgb16,
            PixelFormat::Rgba8,
            PixelFormat::Rgba16,
        ] {
            let image = format.create_canvas(3, 2, Some(WHITE));
            assert_eq!(PixelFormat::of(&image), Some(format));
            assert_eq!((image.width(), image.height()), (3, 2));
        }
    }

    #[test]
    fn test_canvas_fill() {
        let image = PixelFormat::Gray8.create_canvas(2, 2, Some(Color::Gray(0x40)));
        assert!(image.as_luma8().unwrap().pixels().all(|p| p.0 == [0x40]));

        let blank = PixelFormat::Rgba8.create_canvas(2, 2, None);
        assert!(blank.as_rgba8().unwrap().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
