//! Color values and channel conversions
//!
//! Colors are kept in the representation they were requested in and compared
//! by value on their 16-bit RGBA expansion.

use image::Primitive;

/// A face or background color with straight (unpremultiplied) alpha
#[derive(Debug, Clone, Copy)]
pub enum Color {
    Gray(u8),
    Gray16(u16),
    Rgb([u8; 3]),
    Rgb16([u16; 3]),
    Rgba([u8; 4]),
    Rgba16([u16; 4]),
}

pub const BLACK: Color = Color::Gray(0x00);
pub const WHITE: Color = Color::Gray(0xFF);

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb([r, g, b])
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::Rgba([r, g, b, a])
    }

    /// 16-bit straight RGBA channels
    pub fn to_rgba16(self) -> [u16; 4] {
        match self {
            Color::Gray(y) => {
                let y = expand(y);
                [y, y, y, u16::MAX]
            }
            Color::Gray16(y) => [y, y, y, u16::MAX],
            Color::Rgb([r, g, b]) => [expand(r), expand(g), expand(b), u16::MAX],
            Color::Rgb16([r, g, b]) => [r, g, b, u16::MAX],
            Color::Rgba([r, g, b, a]) => [expand(r), expand(g), expand(b), expand(a)],
            Color::Rgba16(channels) => channels,
        }
    }

    pub fn is_16_bit(self) -> bool {
        matches!(self, Color::Gray16(_) | Color::Rgb16(_) | Color::Rgba16(_))
    }

    /// Opposite color for maximum contrast.
    ///
    /// Black and white swap; anything else inverts each RGB channel within
    /// its own depth and keeps alpha.
    pub fn complement(self) -> Self {
        if self == BLACK {
            return WHITE;
        }
        if self == WHITE {
            return BLACK;
        }

        match self {
            Color::Gray(y) => Color::Gray(u8::MAX - y),
            Color::Gray16(y) => Color::Gray16(u16::MAX - y),
            Color::Rgb([r, g, b]) => Color::Rgb([u8::MAX - r, u8::MAX - g, u8::MAX - b]),
            Color::Rgb16([r, g, b]) => Color::Rgb16([u16::MAX - r, u16::MAX - g, u16::MAX - b]),
            Color::Rgba([r, g, b, a]) => {
                Color::Rgba([u8::MAX - r, u8::MAX - g, u8::MAX - b, a])
            }
            Color::Rgba16([r, g, b, a]) => {
                Color::Rgba16([u16::MAX - r, u16::MAX - g, u16::MAX - b, a])
            }
        }
    }

    /// Rec. 709 luma on 16-bit channels
    pub fn luma16(self) -> u16 {
        let [r, g, b, _] = self.to_rgba16();
        luma16(r, g, b)
    }

    pub fn to_gray(self) -> Self {
        match self {
            Color::Gray(_) => self,
            other => Color::Gray((other.luma16() >> 8) as u8),
        }
    }

    pub fn to_gray16(self) -> Self {
        match self {
            Color::Gray16(_) => self,
            other => Color::Gray16(other.luma16()),
        }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `#rrrrggggbbbb` or
    /// `#rrrrggggbbbbaaaa` (leading `#` optional)
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let word = |i: usize| u16::from_str_radix(hex.get(i..i + 4)?, 16).ok();

        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(hex.get(i..i + 1)?, 16)
                        .ok()
                        .map(|v| v * 0x11)
                };
                Some(Color::Rgb([nibble(0)?, nibble(1)?, nibble(2)?]))
            }
            6 => Some(Color::Rgb([byte(0)?, byte(2)?, byte(4)?])),
            8 => Some(Color::Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            12 => Some(Color::Rgb16([word(0)?, word(4)?, word(8)?])),
            16 => Some(Color::Rgba16([word(0)?, word(4)?, word(8)?, word(12)?])),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        match self {
            Color::Gray(y) => format!("#{y:02x}{y:02x}{y:02x}"),
            Color::Rgb([r, g, b]) => format!("#{r:02x}{g:02x}{b:02x}"),
            Color::Rgba([r, g, b, a]) => format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
            Color::Gray16(y) => format!("#{y:04x}{y:04x}{y:04x}"),
            Color::Rgb16([r, g, b]) => format!("#{r:04x}{g:04x}{b:04x}"),
            Color::Rgba16([r, g, b, a]) => format!("#{r:04x}{g:04x}{b:04x}{a:04x}"),
        }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.to_rgba16() == other.to_rgba16()
    }
}

impl Eq for Color {}

/// Rec. 709 luma: `(19595 R + 38470 G + 7471 B + 2^15) >> 16`
#[inline]
pub fn luma16(r: u16, g: u16, b: u16) -> u16 {
    ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + (1 << 15)) >> 16) as u16
}

/// Unweighted mean of the three 8-bit channels, used to pick a glyph
#[inline]
pub fn brightness([r, g, b, _]: [u16; 4]) -> u8 {
    ((u32::from(r >> 8) + u32::from(g >> 8) + u32::from(b >> 8)) / 3) as u8
}

#[inline]
pub fn expand(v: u8) -> u16 {
    u16::from(v) * 0x101
}

/// 16-bit to 8-bit with rounding
#[inline]
pub fn narrow(v: u16) -> u8 {
    ((u32::from(v) * 0xFF + 0x7FFF) / 0xFFFF) as u8
}

/// Whether a 16-bit channel value loses information when stored in 8 bits
#[inline]
pub fn needs_16_bits(v: u16) -> bool {
    v % 0x101 != 0
}

/// Channel depths the engine reads and writes
pub trait Depth: Primitive + 'static {
    fn to_u16(self) -> u16;
    fn from_u16(v: u16) -> Self;
}

impl Depth for u8 {
    #[inline]
    fn to_u16(self) -> u16 {
        expand(self)
    }

    #[inline]
    fn from_u16(v: u16) -> Self {
        narrow(v)
    }
}

impl Depth for u16 {
    #[inline]
    fn to_u16(self) -> u16 {
        self
    }

    #[inline]
    fn from_u16(v: u16) -> Self {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_across_representations() {
        assert_eq!(Color::Gray(0), Color::rgb(0, 0, 0));
        assert_eq!(Color::Gray(0xFF), Color::Rgba16([0xFFFF; 4]));
        assert_eq!(Color::rgb(1, 2, 3), Color::Rgb16([0x0101, 0x0202, 0x0303]));
        assert_ne!(Color::rgb(0, 0, 0), Color::rgba(0, 0, 0, 0x80));
    }

    #[test]
    fn test_complement_black_white() {
        assert_eq!(BLACK.complement(), WHITE);
        assert_eq!(Color::rgb(255, 255, 255).complement(), BLACK);
    }

    #[test]
    fn test_complement_keeps_alpha_and_depth() {
        assert_eq!(
            Color::rgba(10, 20, 30, 40).complement(),
            Color::rgba(245, 235, 225, 40)
        );
        let wide = Color::Rgb16([0x1234, 0, 0xFFFF]).complement();
        assert!(wide.is_16_bit());
        assert_eq!(wide, Color::Rgb16([0xEDCB, 0xFFFF, 0]));
    }

    #[test]
    fn test_luma_of_gray_is_exact() {
        for y in [0u16, 1, 0x7F7F, 0x1234, 0xFFFF] {
            assert_eq!(luma16(y, y, y), y);
        }
    }

    #[test]
    fn test_to_gray() {
        assert_eq!(Color::rgb(128, 128, 128).to_gray(), Color::Gray(128));
        assert_eq!(Color::rgb(255, 0, 0).to_gray(), Color::Gray(76));
        assert_eq!(Color::Gray(7).to_gray16(), Color::Gray16(0x0707));
    }

    #[test]
    fn test_brightness_ignores_alpha() {
        assert_eq!(brightness([0xFFFF, 0xFFFF, 0xFFFF, 0]), 255);
        assert_eq!(brightness([0xFFFF, 0, 0, 0xFFFF]), 85);
        assert_eq!(brightness([0, 0, 0, 0xFFFF]), 0);
    }

    #[test]
    fn test_narrow_round_trips_expand() {
        for v in 0..=255u8 {
            assert_eq!(narrow(expand(v)), v);
            assert!(!needs_16_bits(expand(v)));
        }
        assert!(needs_16_bits(0x0100));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#fff"), Some(WHITE));
        assert_eq!(Color::from_hex("ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_hex("#00000080"),
            Some(Color::rgba(0, 0, 0, 0x80))
        );
        assert!(Color::from_hex("#123456789abc").unwrap().is_16_bit());
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Color::Rgba16([1, 2, 3, 4]);
        assert_eq!(Color::from_hex(&color.to_hex()), Some(color));
    }
}
