//! Render engines
//!
//! Samples one source pixel per glyph cell, maps its brightness through the
//! gradient table and draws the glyph into a new destination image. Three
//! drawing strategies share the sampling loop:
//!
//! - flat: one face color on a background (or transparent) canvas
//! - gray: the flat case on raw 8/16-bit gray buffers
//! - original: each glyph keeps the color of the pixel it was sampled from

pub mod composite;
pub mod flat;
pub mod glyph_face;
pub mod gray;
pub mod original;
pub mod source;

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

use crate::cancel::CancelSignal;
use crate::color_config::ColorConfig;
use crate::color_space::{brightness, BLACK, WHITE};
use crate::error::{AsciiError, Result};
use crate::gradient::GradientTable;
use crate::options::{Options, PixelRatio};
use crate::pixel_format::{canvas, PixelFormat};

use composite::GlyphPixel;
use glyph_face::CELL_SIZE;
pub use source::PixelSource;

/// How glyphs get their color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Flat,
    Gray,
    OriginalColor,
}

impl Strategy {
    pub fn select(color: &ColorConfig, format: PixelFormat) -> Self {
        if color.preserve_original_face() {
            Strategy::OriginalColor
        } else if !color.transparent_background()
            && matches!(format, PixelFormat::Gray8 | PixelFormat::Gray16)
        {
            Strategy::Gray
        } else {
            Strategy::Flat
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Flat => "flat",
            Strategy::Gray => "gray",
            Strategy::OriginalColor => "original-color",
        }
    }
}

/// Sample grid over a source image. Trailing pixels that do not fill a
/// whole sample are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
    pub ratio: PixelRatio,
}

impl Grid {
    pub fn new((width, height): (u32, u32), ratio: PixelRatio) -> Self {
        let (columns, rows) = ratio.samples(width, height);
        Self { columns, rows, ratio }
    }

    /// Destination size in pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.columns.saturating_mul(CELL_SIZE),
            self.rows.saturating_mul(CELL_SIZE),
        )
    }

    /// Source pixel read for a cell
    #[inline]
    pub fn origin(&self, column: u32, row: u32) -> (u32, u32) {
        (column * self.ratio.x, row * self.ratio.y)
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}

/// Outcome of a row loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Finished,
    Cancelled { rows_drawn: u32 },
}

/// Call `draw_row` for every sampled row, polling `cancel` before each one
pub(crate) fn each_row<C>(grid: Grid, cancel: &C, mut draw_row: impl FnMut(u32)) -> Progress
where
    C: CancelSignal + ?Sized,
{
    for row in 0..grid.rows {
        if cancel.is_cancelled() {
            return Progress::Cancelled { rows_drawn: row };
        }
        draw_row(row);
    }
    Progress::Finished
}

/// Fill `line` with the glyphs for one sampled row
pub(crate) fn sample_row<S>(source: &S, gradient: &GradientTable, grid: Grid, row: u32, line: &mut Vec<u8>)
where
    S: PixelSource + ?Sized,
{
    line.clear();
    line.extend((0..grid.columns).map(|column| {
        let (x, y) = grid.origin(column, row);
        gradient.lookup(brightness(source.rgba16(x, y)))
    }));
}

/// Render `source` as glyphs.
///
/// The options are validated on a private copy first. When `cancel` fires
/// the partially drawn destination comes back inside
/// [`AsciiError::Cancelled`].
pub fn generate<S, C>(source: &S, options: &Options, cancel: &C) -> Result<DynamicImage>
where
    S: PixelSource + ?Sized,
    C: CancelSignal + ?Sized,
{
    let options = options.clone().validated();
    let color = options.color();
    let format = color.resolved_format();
    let strategy = Strategy::select(color, format);
    let grid = Grid::new(source.dimensions(), options.pixel_ratio());

    let (width, height) = grid.canvas_size();
    log::debug!(
        "rendering {}x{} cells with {} strategy into {:?} {}x{}",
        grid.columns,
        grid.rows,
        strategy.name(),
        format,
        width,
        height
    );

    let (image, progress) = match (strategy, format) {
        (Strategy::Gray, PixelFormat::Gray8) => {
            let (buffer, progress) = gray::render::<u8, _, _>(source, &options, grid, cancel);
            (DynamicImage::ImageLuma8(buffer), progress)
        }
        (Strategy::Gray, PixelFormat::Gray16) => {
            let (buffer, progress) = gray::render::<u16, _, _>(source, &options, grid, cancel);
            (DynamicImage::ImageLuma16(buffer), progress)
        }
        (_, PixelFormat::Gray8) => {
            render_as::<Luma<u8>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::Gray16) => {
            render_as::<Luma<u16>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::GrayAlpha8) => {
            render_as::<LumaA<u8>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::GrayAlpha16) => {
            render_as::<LumaA<u16>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::Rgb8) => {
            render_as::<Rgb<u8>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::Rgb16) => {
            render_as::<Rgb<u16>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::Rgba8) => {
            render_as::<Rgba<u8>, _, _>(source, &options, grid, strategy, cancel)
        }
        (_, PixelFormat::Rgba16) => {
            render_as::<Rgba<u16>, _, _>(source, &options, grid, strategy, cancel)
        }
    };

    match progress {
        Progress::Finished => Ok(image),
        Progress::Cancelled { rows_drawn } => {
            log::info!("render cancelled after {} of {} rows", rows_drawn, grid.rows);
            Err(AsciiError::Cancelled(Box::new(image)))
        }
    }
}

/// Generic path: any destination pixel type, flat or original colors
fn render_as<P, S, C>(
    source: &S,
    options: &Options,
    grid: Grid,
    strategy: Strategy,
    cancel: &C,
) -> (DynamicImage, Progress)
where
    P: GlyphPixel,
    S: PixelSource + ?Sized,
    C: CancelSignal + ?Sized,
{
    let color = options.color();
    let (width, height) = grid.canvas_size();
    let mut canvas: ImageBuffer<P, Vec<P::Subpixel>> = canvas(width, height, color.fill());

    let progress = match strategy {
        Strategy::OriginalColor => original::draw(&mut canvas, source, options.gradient(), grid, cancel),
        Strategy::Flat | Strategy::Gray => {
            let face = color.face().unwrap_or(BLACK).to_rgba16();
            flat::draw(&mut canvas, source, options.gradient(), grid, face, cancel)
        }
    };

    (P::into_dynamic(canvas), progress)
}

/// Face and background of a gray render, as 16-bit luma
pub(crate) fn gray_pair(color: &ColorConfig) -> (u16, u16) {
    let face = color.face().unwrap_or(BLACK).luma16();
    let background = color.background().unwrap_or(WHITE).luma16();
    (face, background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::{CancelToken, Never};
    use crate::color_space::Color;
    use image::{GrayImage, RgbImage, RgbaImage};
    use std::cell::Cell;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 37 + y * 91) % 256) as u8;
            Rgb([v, v.wrapping_mul(3), 255 - v])
        })
    }

    /// Cancels once it has been asked `limit` times
    struct AfterPolls {
        polls: Cell<u32>,
        limit: u32,
    }

    impl CancelSignal for AfterPolls {
        fn is_cancelled(&self) -> bool {
            let polls = self.polls.get() + 1;
            self.polls.set(polls);
            polls > self.limit
        }
    }

    #[test]
    fn test_output_size_follows_ratio() {
        let source = GrayImage::new(2, 2);
        let image = generate(&source, &Options::new(), &Never).unwrap();
        assert_eq!((image.width(), image.height()), (20, 20));

        let options = Options::new().with_pixel_ratio(2, 1);
        let image = generate(&source, &options, &Never).unwrap();
        assert_eq!((image.width(), image.height()), (10, 20));
    }

    #[test]
    fn test_partial_samples_are_dropped() {
        let source = GrayImage::new(5, 7);
        let options = Options::new().with_pixel_ratio(2, 3);
        let image = generate(&source, &options, &Never).unwrap();
        assert_eq!((image.width(), image.height()), (20, 20));
    }

    #[test]
    fn test_empty_grid() {
        let source = GrayImage::new(1, 1);
        let options = Options::new().with_pixel_ratio(2, 2);
        let image = generate(&source, &options, &Never).unwrap();
        assert_eq!((image.width(), image.height()), (0, 0));
    }

    #[test]
    fn test_default_render_is_gray8() {
        let image = generate(&gradient_image(4, 3), &Options::new(), &Never).unwrap();
        assert!(image.as_luma8().is_some());
    }

    #[test]
    fn test_white_source_renders_blank() {
        let source = GrayImage::from_pixel(3, 3, Luma([255]));
        let image = generate(&source, &Options::new(), &Never).unwrap();
        // brightest glyph of the default gradient is a space
        assert!(image.as_luma8().unwrap().pixels().all(|p| p.0 == [255]));
    }

    #[test]
    fn test_black_source_draws_ink() {
        let source = GrayImage::from_pixel(3, 3, Luma([0]));
        let image = generate(&source, &Options::new(), &Never).unwrap();
        assert!(image.as_luma8().unwrap().pixels().any(|p| p.0 == [0]));
    }

    #[test]
    fn test_colored_face_uses_rgb() {
        let options = Options::new()
            .with_face(Color::rgb(200, 0, 0))
            .with_background(Color::rgb(0, 0, 40));
        let image = generate(&gradient_image(3, 3), &options, &Never).unwrap();
        let buffer = image.as_rgb8().unwrap();
        assert!(buffer.pixels().any(|p| p.0 == [200, 0, 0]));
        assert!(buffer.pixels().any(|p| p.0 == [0, 0, 40]));
    }

    #[test]
    fn test_transparent_background() {
        let source = GrayImage::from_pixel(2, 2, Luma([0]));
        let options = Options::new().with_transparent_background(true);
        let image = generate(&source, &options, &Never).unwrap();
        let buffer = image.as_luma_alpha8().unwrap();
        assert!(buffer.pixels().any(|p| p.0 == [0, 0]));
        assert!(buffer.pixels().any(|p| p.0 == [0, 255]));
    }

    #[test]
    fn test_original_color_keeps_source_colors() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let options = Options::new().with_original_face(true);
        let image = generate(&source, &options, &Never).unwrap();
        let buffer = image.as_rgba8().unwrap();
        assert!(buffer.pixels().any(|p| p.0 == [10, 20, 30, 255]));
        assert!(buffer.pixels().any(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_pre_cancelled_returns_blank_canvas() {
        let token = CancelToken::new();
        token.cancel();
        let source = GrayImage::from_pixel(3, 3, Luma([0]));
        let partial = generate(&source, &Options::new(), &token).unwrap_err().into_partial().unwrap();
        assert_eq!((partial.width(), partial.height()), (30, 30));
        assert!(partial.as_luma8().unwrap().pixels().all(|p| p.0 == [255]));
    }

    #[test]
    fn test_cancel_after_first_row() {
        let source = GrayImage::from_pixel(3, 3, Luma([0]));
        let cancel = AfterPolls {
            polls: Cell::new(0),
            limit: 1,
        };
        let partial = generate(&source, &Options::new(), &cancel).unwrap_err().into_partial().unwrap();
        let buffer = partial.as_luma8().unwrap();
        let inked = |y0: u32| (y0..y0 + CELL_SIZE).any(|y| (0..30).any(|x| buffer.get_pixel(x, y).0 == [0]));
        assert!(inked(0));
        assert!(!inked(10));
        assert!(!inked(20));
    }

    #[test]
    fn test_options_are_not_mutated() {
        let options = Options::new().with_face(Color::rgb(1, 2, 3)).with_background(None::<Color>);
        let before = options.clone();

        generate(&GrayImage::new(1, 1), &options, &Never).unwrap();

        assert!(!options.is_validated());
        assert_eq!(options.color(), before.color());
        assert_eq!(options.color().background(), None);
        assert_eq!(options.color().format(), None);
    }

    #[test]
    fn test_strategy_selection() {
        let mut color = ColorConfig::default();
        assert_eq!(Strategy::select(&color, color.resolved_format()), Strategy::Gray);

        color.set_face(Some(Color::rgb(1, 2, 3)));
        assert_eq!(Strategy::select(&color, color.resolved_format()), Strategy::Flat);

        color.set_preserve_original_face(true);
        assert_eq!(Strategy::select(&color, color.resolved_format()), Strategy::OriginalColor);
    }
}
