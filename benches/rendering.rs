//! Rendering benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glyphcast::cancel::Never;
use glyphcast::color_space::Color;
use glyphcast::resize::resize;
use glyphcast::{generate, Options};
use image::{DynamicImage, RgbImage};

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbImage::new(width, height);
    for x in 0..width {
        for y in 0..height {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            let b = (((x + y) as f32 / (width + height) as f32) * 255.0) as u8;
            img.put_pixel(x, y, image::Rgb([r, g, b]));
        }
    }
    DynamicImage::ImageRgb8(img)
}

fn benchmark_strategies(c: &mut Criterion) {
    let image = create_test_image(200, 150);

    let mut group = c.benchmark_group("Glyph Rendering");

    let cases = [
        ("gray", Options::new()),
        (
            "flat_rgb",
            Options::new()
                .with_face(Color::rgb(230, 90, 20))
                .with_background(Color::rgb(10, 10, 40)),
        ),
        ("transparent", Options::new().with_transparent_background(true)),
        ("original_color", Options::new().with_original_face(true)),
    ];

    for (name, options) in cases.iter() {
        let options = options.clone().validated();
        group.bench_function(*name, |b| {
            b.iter(|| generate(black_box(&image), black_box(&options), &Never))
        });
    }

    group.finish();
}

fn benchmark_pixel_ratio(c: &mut Criterion) {
    let image = create_test_image(400, 300);

    let mut group = c.benchmark_group("Pixel Ratio");

    for ratio in [1, 2, 4, 8].iter() {
        let options = Options::new().with_pixel_ratio(*ratio, *ratio).validated();
        group.bench_function(format!("ratio_{}", ratio), |b| {
            b.iter(|| generate(black_box(&image), black_box(&options), &Never))
        });
    }

    group.finish();
}

fn benchmark_resize(c: &mut Criterion) {
    let image = create_test_image(800, 600);

    let mut group = c.benchmark_group("Lanczos2 Resize");

    for width in [100, 200, 400].iter() {
        group.bench_function(format!("width_{}", width), |b| {
            b.iter(|| resize(black_box(&image), *width, *width * 3 / 4))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_strategies, benchmark_pixel_ratio, benchmark_resize);
criterion_main!(benches);
