//! Render options
//!
//! Options are plain values: a render works on its own copy, so overriding
//! fields for one call never touches the caller's defaults.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color_config::ColorConfig;
use crate::color_space::Color;
use crate::gradient::GradientTable;

/// Source pixels consumed per glyph cell along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRatio {
    pub x: u32,
    pub y: u32,
}

impl Default for PixelRatio {
    fn default() -> Self {
        Self { x: 1, y: 1 }
    }
}

impl PixelRatio {
    pub fn new(x: u32, y: u32) -> Self {
        let mut ratio = Self { x, y };
        ratio.validate();
        ratio
    }

    /// Non-positive components become 1
    pub fn from_signed(x: i64, y: i64) -> Self {
        let clamp = |v: i64| u32::try_from(v).unwrap_or(if v < 0 { 1 } else { u32::MAX });
        Self::new(clamp(x), clamp(y))
    }

    pub fn validate(&mut self) {
        self.x = self.x.max(1);
        self.y = self.y.max(1);
    }

    /// Number of whole samples that fit in a `width` x `height` source
    pub fn samples(&self, width: u32, height: u32) -> (u32, u32) {
        (width / self.x.max(1), height / self.y.max(1))
    }
}

pub const DEFAULT_MAX_CELLS: u32 = 10_000;
pub const MAX_COMPRESSION: u8 = 99;

/// Limits applied before rendering, measured in glyph cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeConstraints {
    pub max_width: u32,
    pub max_height: u32,
    /// Percentage to shrink the source by, 0 to 99
    pub compression: u8,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CELLS,
            max_height: DEFAULT_MAX_CELLS,
            compression: 0,
        }
    }
}

impl SizeConstraints {
    pub fn validate(&mut self) {
        if self.max_width == 0 {
            self.max_width = DEFAULT_MAX_CELLS;
        }
        if self.max_height == 0 {
            self.max_height = DEFAULT_MAX_CELLS;
        }
        if self.compression > MAX_COMPRESSION {
            self.compression = 0;
        }
    }

    /// Source size to resample to before rendering, or `None` when the
    /// source already fits and no compression is requested.
    ///
    /// Oversized sources are shrunk, keeping aspect, until their sample grid
    /// fits the max cell counts; compression then scales both sides. Neither
    /// side drops below 1.
    pub fn target_dimensions(&self, (width, height): (u32, u32), ratio: PixelRatio) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }

        let (columns, rows) = ratio.samples(width, height);
        let mut target = (f64::from(width), f64::from(height));

        if columns > self.max_width || rows > self.max_height {
            let limit_x = f64::from(self.max_width) * f64::from(ratio.x) / f64::from(width);
            let limit_y = f64::from(self.max_height) * f64::from(ratio.y) / f64::from(height);
            let scale = limit_x.min(limit_y);
            target = (target.0 * scale, target.1 * scale);
        }

        if self.compression > 0 {
            let keep = f64::from(100 - self.compression.min(MAX_COMPRESSION)) / 100.0;
            target = (target.0 * keep, target.1 * keep);
        }

        let target = (
            (target.0.floor() as u32).clamp(1, width),
            (target.1.floor() as u32).clamp(1, height),
        );

        (target != (width, height)).then_some(target)
    }
}

/// Everything a render needs
#[derive(Debug, Clone)]
pub struct Options {
    pixel_ratio: PixelRatio,
    gradient: Arc<GradientTable>,
    color: ColorConfig,
    constraints: SizeConstraints,
    validated: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pixel_ratio: PixelRatio::default(),
            gradient: Arc::new(GradientTable::default()),
            color: ColorConfig::default(),
            constraints: SizeConstraints::default(),
            validated: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace out-of-range values with defaults and resolve colors.
    /// Validating valid options changes nothing.
    pub fn validate(&mut self) {
        if self.validated {
            return;
        }
        self.pixel_ratio.validate();
        self.constraints.validate();
        self.color.resolve();
        self.validated = true;
    }

    pub fn validated(mut self) -> Self {
        self.validate();
        self
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn pixel_ratio(&self) -> PixelRatio {
        self.pixel_ratio
    }

    pub fn gradient(&self) -> &GradientTable {
        &self.gradient
    }

    pub fn color(&self) -> &ColorConfig {
        &self.color
    }

    pub fn constraints(&self) -> SizeConstraints {
        self.constraints
    }

    pub fn set_pixel_ratio(&mut self, x: u32, y: u32) {
        self.pixel_ratio = PixelRatio { x, y };
        self.validated = false;
    }

    pub fn set_chars(&mut self, chars: &str) {
        self.gradient = Arc::new(GradientTable::new(chars));
    }

    pub fn set_gradient(&mut self, gradient: Arc<GradientTable>) {
        self.gradient = gradient;
    }

    pub fn set_face(&mut self, face: impl Into<Option<Color>>) {
        self.color.set_face(face.into());
        self.validated = false;
    }

    pub fn set_background(&mut self, background: impl Into<Option<Color>>) {
        self.color.set_background(background.into());
        self.validated = false;
    }

    pub fn set_transparent_background(&mut self, transparent: bool) {
        self.color.set_transparent_background(transparent);
        self.validated = false;
    }

    pub fn set_original_face(&mut self, preserve: bool) {
        self.color.set_preserve_original_face(preserve);
        self.validated = false;
    }

    pub fn set_color(&mut self, color: ColorConfig) {
        self.color = color;
        self.validated = false;
    }

    pub fn set_max_width(&mut self, cells: u32) {
        self.constraints.max_width = cells;
        self.validated = false;
    }

    pub fn set_max_height(&mut self, cells: u32) {
        self.constraints.max_height = cells;
        self.validated = false;
    }

    pub fn set_compression(&mut self, percent: u8) {
        self.constraints.compression = percent;
        self.validated = false;
    }

    pub fn with_pixel_ratio(mut self, x: u32, y: u32) -> Self {
        self.set_pixel_ratio(x, y);
        self
    }

    pub fn with_chars(mut self, chars: &str) -> Self {
        self.set_chars(chars);
        self
    }

    pub fn with_gradient(mut self, gradient: Arc<GradientTable>) -> Self {
        self.set_gradient(gradient);
        self
    }

    pub fn with_face(mut self, face: impl Into<Option<Color>>) -> Self {
        self.set_face(face);
        self
    }

    pub fn with_background(mut self, background: impl Into<Option<Color>>) -> Self {
        self.set_background(background);
        self
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.set_transparent_background(transparent);
        self
    }

    pub fn with_original_face(mut self, preserve: bool) -> Self {
        self.set_original_face(preserve);
        self
    }

    pub fn with_max_width(mut self, cells: u32) -> Self {
        self.set_max_width(cells);
        self
    }

    pub fn with_max_height(mut self, cells: u32) -> Self {
        self.set_max_height(cells);
        self
    }

    pub fn with_compression(mut self, percent: u8) -> Self {
        self.set_compression(percent);
        self
    }
}
