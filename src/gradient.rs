//! Brightness to glyph lookup
//!
//! A gradient is an ordered dark-to-light run of ASCII characters. It is
//! stretched over the 256 brightness levels once and then only indexed.

use std::fmt;
use std::sync::OnceLock;

/// Gradient used whenever the requested one is empty or not plain ASCII
pub const DEFAULT_GRADIENT: &str = "@%#*+=:~-.  ";

/// 256-entry table mapping brightness (0 = darkest) to a glyph byte
#[derive(Clone, PartialEq, Eq)]
pub struct GradientTable {
    glyphs: [u8; 256],
    source: String,
}

impl GradientTable {
    /// Build a table from a dark-to-light character sequence.
    ///
    /// Empty input and input containing any multi-byte character fall back to
    /// [`DEFAULT_GRADIENT`]. A single character yields a constant table.
    pub fn new(chars: &str) -> Self {
        if chars.is_empty() || !chars.is_ascii() {
            return Self::default();
        }
        Self::stretch(chars)
    }

    fn stretch(chars: &str) -> Self {
        let bytes = chars.as_bytes();
        let last = bytes.len() - 1;

        let mut glyphs = [0u8; 256];
        for (brightness, glyph) in glyphs.iter_mut().enumerate() {
            *glyph = bytes[brightness * last / 255];
        }

        Self {
            glyphs,
            source: chars.to_string(),
        }
    }

    /// Glyph for an already clamped brightness
    #[inline]
    pub fn lookup(&self, brightness: u8) -> u8 {
        self.glyphs[brightness as usize]
    }

    pub fn glyphs(&self) -> &[u8; 256] {
        &self.glyphs
    }

    /// The gradient string the table was stretched from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_default(&self) -> bool {
        self.source == DEFAULT_GRADIENT
    }
}

impl Default for GradientTable {
    fn default() -> Self {
        static DEFAULT: OnceLock<GradientTable> = OnceLock::new();
        DEFAULT
            .get_or_init(|| GradientTable::stretch(DEFAULT_GRADIENT))
            .clone()
    }
}

impl fmt::Debug for GradientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientTable")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for GradientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
