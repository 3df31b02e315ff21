//! Flat-color drawing: every glyph in the face color

use image::ImageBuffer;

use super::composite::GlyphPixel;
use super::glyph_face::{draw_glyphs, CELL_SIZE};
use super::{each_row, sample_row, Grid, PixelSource, Progress};
use crate::cancel::CancelSignal;
use crate::gradient::GradientTable;

/// Draw each sampled row as one glyph string in `face`
pub fn draw<P, S, C>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    source: &S,
    gradient: &GradientTable,
    grid: Grid,
    face: [u16; 4],
    cancel: &C,
) -> Progress
where
    P: GlyphPixel,
    S: PixelSource + ?Sized,
    C: CancelSignal + ?Sized,
{
    let mut line = Vec::with_capacity(grid.columns as usize);

    each_row(grid, cancel, |row| {
        sample_row(source, gradient, grid, row, &mut line);
        draw_glyphs(canvas, (0, row * CELL_SIZE), &line, face);
    })
}
