//! Gray fast path
//!
//! Works straight on the `Luma` sample slice instead of going through the
//! per-pixel RGBA conversions of the generic path. The arithmetic is the
//! same, so both paths produce identical buffers.

use image::{ImageBuffer, Luma, Pixel};

use super::composite::blend_channel;
use super::glyph_face::{for_each_ink, CELL_SIZE};
use super::{each_row, gray_pair, sample_row, Grid, PixelSource, Progress};
use crate::cancel::CancelSignal;
use crate::color_space::Depth;
use crate::options::Options;

/// Render into a fresh gray buffer of depth `T`
pub fn render<T, S, C>(
    source: &S,
    options: &Options,
    grid: Grid,
    cancel: &C,
) -> (ImageBuffer<Luma<T>, Vec<T>>, Progress)
where
    T: Depth,
    Luma<T>: Pixel<Subpixel = T>,
    S: PixelSource + ?Sized,
    C: CancelSignal + ?Sized,
{
    let (face, background) = gray_pair(options.color());
    let (width, height) = grid.canvas_size();
    let mut canvas = ImageBuffer::from_pixel(width, height, Luma([T::from_u16(background)]));

    let stride = width as usize;
    let mut line = Vec::with_capacity(grid.columns as usize);
    let progress = {
        let samples: &mut [T] = &mut canvas;
        each_row(grid, cancel, |row| {
            sample_row(source, options.gradient(), grid, row, &mut line);
            let top = (row * CELL_SIZE) as usize;
            for (column, &glyph) in line.iter().enumerate() {
                let left = column * CELL_SIZE as usize;
                for_each_ink(glyph, |dx, dy| {
                    let index = (top + dy as usize) * stride + left + dx as usize;
                    let dst = &mut samples[index];
                    *dst = T::from_u16(blend_channel(dst.to_u16(), face, u16::MAX));
                });
            }
        })
    };

    (canvas, progress)
}
