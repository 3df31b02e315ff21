//! Lanczos-2 resampling
//!
//! Each destination pixel maps back to the source with center alignment and
//! takes a separable Lanczos-2 weighting of the 4x4 source neighborhood
//! around that point. Neighbors past the border read the nearest edge
//! pixel. The weighted sum is clamped to the 16-bit range and truncated.

use std::f64::consts::PI;

use image::{ImageBuffer, Rgba};

use crate::render_engines::PixelSource;

/// Destination of [`resize`], straight RGBA with 16-bit channels
pub type Resized = ImageBuffer<Rgba<u16>, Vec<u16>>;

const RADIUS: f64 = 2.0;

/// Lanczos kernel with a = 2
pub fn lanczos2(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x.abs() >= RADIUS {
        return 0.0;
    }
    let px = PI * x;
    RADIUS * px.sin() * (px / RADIUS).sin() / (px * px)
}

/// Taps of one axis: four source indices and their weights
#[derive(Debug, Clone, Copy)]
struct Taps {
    index: [u32; 4],
    weight: [f64; 4],
}

impl Taps {
    fn new(dst: u32, scale: f64, extent: u32) -> Self {
        let center = (f64::from(dst) + 0.5) * scale - 0.5;
        let first = center.floor() as i64 - 1;
        let last = i64::from(extent) - 1;

        let mut index = [0; 4];
        let mut weight = [0.0; 4];
        for tap in 0..4 {
            let position = first + tap as i64;
            index[tap] = position.clamp(0, last) as u32;
            weight[tap] = lanczos2(center - position as f64);
        }

        Self { index, weight }
    }
}

/// Resample `source` to `width` x `height`
pub fn resize<S: PixelSource + ?Sized>(source: &S, width: u32, height: u32) -> Resized {
    debug_assert!(width >= 1 && height >= 1, "resize target must be at least 1x1");

    let (src_width, src_height) = source.dimensions();
    if src_width == 0 || src_height == 0 {
        return ImageBuffer::new(width, height);
    }

    let x_scale = f64::from(src_width) / f64::from(width);
    let y_scale = f64::from(src_height) / f64::from(height);
    let columns: Vec<Taps> = (0..width).map(|x| Taps::new(x, x_scale, src_width)).collect();
    let rows: Vec<Taps> = (0..height).map(|y| Taps::new(y, y_scale, src_height)).collect();

    ImageBuffer::from_fn(width, height, |x, y| {
        let (column, row) = (&columns[x as usize], &rows[y as usize]);
        let mut sum = [0.0f64; 4];

        for (&sy, &wy) in row.index.iter().zip(&row.weight) {
            for (&sx, &wx) in column.index.iter().zip(&column.weight) {
                let weight = wx * wy;
                let pixel = source.rgba16(sx, sy);
                for (acc, channel) in sum.iter_mut().zip(pixel) {
                    *acc += f64::from(channel) * weight;
                }
            }
        }

        // weights are not renormalized; the clamp absorbs overshoot
        Rgba(sum.map(|v| v.clamp(0.0, 65535.0) as u16))
    })
}
