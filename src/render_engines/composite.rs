//! Per-format pixel compositing
//!
//! All arithmetic runs on 16-bit straight channels; 8-bit formats widen on
//! read and round back on write.

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};

use crate::color_space::{luma16, Color, Depth};

const MAX: u64 = 0xFFFF;

/// `a * b / 0xFFFF`, rounded
#[inline]
fn mul16(a: u16, b: u16) -> u16 {
    ((u64::from(a) * u64::from(b) + 0x7FFF) / MAX) as u16
}

/// `dst * (1 - a) + src * a` for an opaque destination channel
#[inline]
pub fn blend_channel(dst: u16, src: u16, alpha: u16) -> u16 {
    ((u64::from(dst) * (MAX - u64::from(alpha)) + u64::from(src) * u64::from(alpha)) / MAX) as u16
}

/// Straight-alpha "over" of `src` onto `dst`, with `coverage` scaling the
/// source alpha (the glyph mask value)
pub fn over([dr, dg, db, da]: [u16; 4], [sr, sg, sb, sa]: [u16; 4], coverage: u16) -> [u16; 4] {
    let alpha = mul16(sa, coverage);
    if alpha == 0 {
        return [dr, dg, db, da];
    }
    if da == u16::MAX {
        return [
            blend_channel(dr, sr, alpha),
            blend_channel(dg, sg, alpha),
            blend_channel(db, sb, alpha),
            u16::MAX,
        ];
    }

    let behind = mul16(da, u16::MAX - alpha);
    let out_alpha = u64::from(alpha) + u64::from(behind);
    if out_alpha == 0 {
        return [0; 4];
    }

    let mix = |d: u16, s: u16| {
        ((u64::from(s) * u64::from(alpha) + u64::from(d) * u64::from(behind)) / out_alpha) as u16
    };
    [mix(dr, sr), mix(dg, sg), mix(db, sb), out_alpha.min(MAX) as u16]
}

/// Destination pixel types the engine can draw glyphs into
pub trait GlyphPixel: Pixel + 'static {
    fn from_rgba16(channels: [u16; 4]) -> Self;
    fn to_rgba16(&self) -> [u16; 4];

    fn from_color(color: Color) -> Self {
        Self::from_rgba16(color.to_rgba16())
    }

    /// Composite a source color over this pixel
    fn composite(&mut self, src: [u16; 4], coverage: u16) {
        *self = Self::from_rgba16(over(self.to_rgba16(), src, coverage));
    }

    fn into_dynamic(buffer: ImageBuffer<Self, Vec<Self::Subpixel>>) -> DynamicImage;
}

macro_rules! gray_pixel {
    ($pixel:ident, $depth:ty, $variant:ident) => {
        impl GlyphPixel for $pixel<$depth> {
            fn from_rgba16([r, g, b, _]: [u16; 4]) -> Self {
                $pixel([<$depth as Depth>::from_u16(luma16(r, g, b))])
            }

            fn to_rgba16(&self) -> [u16; 4] {
                let y = self.0[0].to_u16();
                [y, y, y, u16::MAX]
            }

            fn into_dynamic(buffer: ImageBuffer<Self, Vec<$depth>>) -> DynamicImage {
                DynamicImage::$variant(buffer)
            }
        }
    };
}

macro_rules! gray_alpha_pixel {
    ($depth:ty, $variant:ident) => {
        impl GlyphPixel for LumaA<$depth> {
            fn from_rgba16([r, g, b, a]: [u16; 4]) -> Self {
                LumaA([
                    <$depth as Depth>::from_u16(luma16(r, g, b)),
                    <$depth as Depth>::from_u16(a),
                ])
            }

            fn to_rgba16(&self) -> [u16; 4] {
                let [y, a] = self.0;
                let y = y.to_u16();
                [y, y, y, a.to_u16()]
            }

            fn into_dynamic(buffer: ImageBuffer<Self, Vec<$depth>>) -> DynamicImage {
                DynamicImage::$variant(buffer)
            }
        }
    };
}

macro_rules! rgb_pixel {
    ($depth:ty, $variant:ident) => {
        impl GlyphPixel for Rgb<$depth> {
            fn from_rgba16([r, g, b, _]: [u16; 4]) -> Self {
                Rgb([r, g, b].map(<$depth as Depth>::from_u16))
            }

            fn to_rgba16(&self) -> [u16; 4] {
                let [r, g, b] = self.0.map(Depth::to_u16);
                [r, g, b, u16::MAX]
            }

            fn into_dynamic(buffer: ImageBuffer<Self, Vec<$depth>>) -> DynamicImage {
                DynamicImage::$variant(buffer)
            }
        }
    };
}

macro_rules! rgba_pixel {
    ($depth:ty, $variant:ident) => {
        impl GlyphPixel for Rgba<$depth> {
            fn from_rgba16(channels: [u16; 4]) -> Self {
                Rgba(channels.map(<$depth as Depth>::from_u16))
            }

            fn to_rgba16(&self) -> [u16; 4] {
                self.0.map(Depth::to_u16)
            }

            fn into_dynamic(buffer: ImageBuffer<Self, Vec<$depth>>) -> DynamicImage {
                DynamicImage::$variant(buffer)
            }
        }
    };
}

gray_pixel!(Luma, u8, ImageLuma8);
gray_pixel!(Luma, u16, ImageLuma16);
gray_alpha_pixel!(u8, ImageLumaA8);
gray_alpha_pixel!(u16, ImageLumaA16);
rgb_pixel!(u8, ImageRgb8);
rgb_pixel!(u16, ImageRgb16);
rgba_pixel!(u8, ImageRgba8);
rgba_pixel!(u16, ImageRgba16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_coverage_replaces_opaque() {
        let dst = [0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF];
        let src = [0x1111, 0x2222, 0x3333, 0xFFFF];
        assert_eq!(over(dst, src, 0xFFFF), src);
    }

    #[test]
    fn test_zero_coverage_keeps_destination() {
        let dst = [1, 2, 3, 4];
        assert_eq!(over(dst, [9, 9, 9, 0xFFFF], 0), dst);
    }

    #[test]
    fn test_half_blend() {
        let out = over([0, 0, 0, 0xFFFF], [0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF], 0x8000);
        assert!((i32::from(out[0]) - 0x8000).abs() <= 1);
        assert_eq!(out[3], 0xFFFF);
    }

    #[test]
    fn test_over_transparent_destination() {
        let src = [0x4000, 0x8000, 0xC000, 0x8000];
        assert_eq!(over([0; 4], src, 0xFFFF), src);
    }

    #[test]
    fn test_8_bit_round_trip() {
        let mut pixel = Rgb::<u8>([0, 0, 0]);
        pixel.composite(Color::rgb(12, 34, 56).to_rgba16(), 0xFFFF);
        assert_eq!(pixel.0, [12, 34, 56]);
    }

    #[test]
    fn test_gray_from_color_uses_luma() {
        let pixel = Luma::<u8>::from_color(Color::rgb(255, 0, 0));
        assert_eq!(pixel.0, [76]);
        let pixel = Luma::<u16>::from_color(Color::Gray(0x12));
        assert_eq!(pixel.0, [0x1212]);
    }

    #[test]
    fn test_alpha_formats_keep_alpha() {
        let pixel = LumaA::<u8>::from_color(Color::rgba(9, 9, 9, 7));
        assert_eq!(pixel.0, [9, 7]);
        let pixel = Rgba::<u16>::from_color(Color::rgba(1, 2, 3, 4));
        assert_eq!(pixel.0, [0x0101, 0x0202, 0x0303, 0x0404]);
    }
}
