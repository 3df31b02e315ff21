//! Original-color drawing
//!
//! Each glyph takes the color of its sample. Consecutive samples of the same
//! color are drawn as one run, which paints exactly what drawing them one by
//! one would.

use image::ImageBuffer;

use super::composite::GlyphPixel;
use super::glyph_face::{draw_glyphs, CELL_SIZE};
use super::{each_row, Grid, PixelSource, Progress};
use crate::cancel::CancelSignal;
use crate::color_space::brightness;
use crate::gradient::GradientTable;

pub fn draw<P, S, C>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    source: &S,
    gradient: &GradientTable,
    grid: Grid,
    cancel: &C,
) -> Progress
where
    P: GlyphPixel,
    S: PixelSource + ?Sized,
    C: CancelSignal + ?Sized,
{
    let mut line = Vec::with_capacity(grid.columns as usize);
    let mut colors = Vec::with_capacity(grid.columns as usize);

    each_row(grid, cancel, |row| {
        line.clear();
        colors.clear();
        for column in 0..grid.columns {
            let (x, y) = grid.origin(column, row);
            let rgba = source.rgba16(x, y);
            line.push(gradient.lookup(brightness(rgba)));
            colors.push(rgba);
        }

        let top = row * CELL_SIZE;
        for (start, end) in runs(&colors) {
            draw_glyphs(canvas, (start as u32 * CELL_SIZE, top), &line[start..end], colors[start]);
        }
    })
}

/// `start..end` ranges of equal neighbours
fn runs(colors: &[[u16; 4]]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut start = 0;
    std::iter::from_fn(move || {
        let first = colors.get(start)?;
        let len = colors[start..].iter().take_while(|c| *c == first).count();
        let run = (start, start + len);
        start += len;
        Some(run)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Never;
    use crate::options::PixelRatio;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_runs() {
        let a = [1, 1, 1, 1];
        let b = [2, 2, 2, 2];
        let found: Vec<_> = runs(&[a, a, b, a]).collect();
        assert_eq!(found, vec![(0, 2), (2, 3), (3, 4)]);
        assert_eq!(runs(&[]).count(), 0);
    }

    #[test]
    fn test_batching_matches_single_glyphs() {
        let source = RgbaImage::from_fn(6, 3, |x, y| {
            if x < 3 {
                Rgba([20, 40, 60, 255])
            } else {
                Rgba([(x * 30) as u8, (y * 50) as u8, 90, 200])
            }
        });
        let grid = Grid::new((6, 3), PixelRatio::default());
        let gradient = GradientTable::default();

        let mut batched = RgbaImage::from_pixel(60, 30, Rgba([255, 255, 255, 255]));
        draw(&mut batched, &source, &gradient, grid, &Never);

        let mut single = RgbaImage::from_pixel(60, 30, Rgba([255, 255, 255, 255]));
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let rgba = source.rgba16(column, row);
                let glyph = gradient.lookup(brightness(rgba));
                draw_glyphs(&mut single, (column * CELL_SIZE, row * CELL_SIZE), &[glyph], rgba);
            }
        }

        assert_eq!(batched, single);
    }
}
