//! Face/background color resolution
//!
//! Turns a raw color request into a contrast-safe pair plus the minimal
//! destination format. Which colors matter depends on two flags:
//!
//! | original face | transparent bg | needs            |
//! |---------------|----------------|------------------|
//! | no            | no             | face, background |
//! | no            | yes            | face             |
//! | yes           | no             | background       |
//! | yes           | yes            | nothing          |

use crate::color_space::{needs_16_bits, Color, BLACK, WHITE};
use crate::pixel_format::PixelFormat;

/// Color request for a render
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    face: Option<Color>,
    background: Option<Color>,
    transparent_background: bool,
    preserve_original_face: bool,
    format: Option<PixelFormat>,
}

impl Default for ColorConfig {
    /// Black glyphs on a white background
    fn default() -> Self {
        Self::new(Some(BLACK), Some(WHITE))
    }
}

impl ColorConfig {
    pub fn new(face: Option<Color>, background: Option<Color>) -> Self {
        Self {
            face,
            background,
            transparent_background: false,
            preserve_original_face: false,
            format: None,
        }
    }

    pub fn face(&self) -> Option<Color> {
        self.face
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn transparent_background(&self) -> bool {
        self.transparent_background
    }

    pub fn preserve_original_face(&self) -> bool {
        self.preserve_original_face
    }

    /// Resolved destination format, `None` until [`resolve`](Self::resolve)
    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    /// Resolved format, resolving a copy when this config has not been
    /// resolved yet
    pub fn resolved_format(&self) -> PixelFormat {
        match self.format {
            Some(format) => format,
            None => self.clone().resolve(),
        }
    }

    pub fn set_face(&mut self, face: Option<Color>) {
        self.face = face;
        self.format = None;
    }

    pub fn set_background(&mut self, background: Option<Color>) {
        self.background = background;
        self.format = None;
    }

    pub fn set_transparent_background(&mut self, transparent: bool) {
        self.transparent_background = transparent;
        self.format = None;
    }

    pub fn set_preserve_original_face(&mut self, preserve: bool) {
        self.preserve_original_face = preserve;
        self.format = None;
    }

    /// Background the destination is pre-filled with, if any
    pub fn fill(&self) -> Option<Color> {
        if self.transparent_background {
            None
        } else {
            self.background
        }
    }

    /// Resolve colors and format. Resolving twice is a no-op.
    pub fn resolve(&mut self) -> PixelFormat {
        if let Some(format) = self.format {
            return format;
        }

        let face_needed = !self.preserve_original_face;
        let background_needed = !self.transparent_background;

        let format = match (face_needed, background_needed) {
            (true, true) => self.resolve_pair(),
            (true, false) => {
                let face = *self.face.get_or_insert(BLACK);
                PixelFormat::classify(&[face]).with_alpha()
            }
            (false, true) => {
                let background = *self.background.get_or_insert(WHITE);
                if background.to_rgba16().into_iter().any(needs_16_bits) {
                    PixelFormat::Rgba16
                } else {
                    PixelFormat::Rgba8
                }
            }
            (false, false) => PixelFormat::Rgba16,
        };

        self.format = Some(format);
        format
    }

    fn resolve_pair(&mut self) -> PixelFormat {
        let (face, background) = match (self.face, self.background) {
            (Some(face), Some(background))
                if (face == BLACK && background == WHITE) || (face == WHITE && background == BLACK) =>
            {
                return PixelFormat::Gray8;
            }
            (None, None) => {
                self.face = Some(BLACK);
                self.background = Some(WHITE);
                return PixelFormat::Gray8;
            }
            (None, Some(background)) => (background.complement(), background),
            (Some(face), None) => (face, face.complement()),
            (Some(face), Some(background)) if face == background => (background.complement(), background),
            (Some(face), Some(background)) => (face, background),
        };

        let format = PixelFormat::classify(&[face, background]);
        let (face, background) = match format {
            PixelFormat::Gray8 => (face.to_gray(), background.to_gray()),
            PixelFormat::Gray16 => (face.to_gray16(), background.to_gray16()),
            _ => (face, background),
        };

        self.face = Some(face);
        self.background = Some(background);
        format
    }
}
