//! Render front door
//!
//! A [`Generator`] owns validated default options. Each call may override
//! them on a private copy, then runs the size constraints, the optional
//! resample and the render engine in that order.

use image::DynamicImage;

use crate::cancel::CancelSignal;
use crate::error::Result;
use crate::options::Options;
use crate::render_engines::{self, PixelSource};
use crate::resize::resize;

#[derive(Debug, Clone)]
pub struct Generator {
    defaults: Options,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Self {
            defaults: options.validated(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.defaults
    }

    /// Render with the default options
    pub fn generate<S, C>(&self, source: &S, cancel: &C) -> Result<DynamicImage>
    where
        S: PixelSource + ?Sized,
        C: CancelSignal + ?Sized,
    {
        render(source, &self.defaults, cancel)
    }

    /// Render with `overrides` applied to a copy of the defaults
    pub fn generate_with<S, C, F>(&self, source: &S, cancel: &C, overrides: F) -> Result<DynamicImage>
    where
        S: PixelSource + ?Sized,
        C: CancelSignal + ?Sized,
        F: FnOnce(&mut Options),
    {
        let mut options = self.defaults.clone();
        overrides(&mut options);
        options.validate();
        render(source, &options, cancel)
    }
}

fn render<S, C>(source: &S, options: &Options, cancel: &C) -> Result<DynamicImage>
where
    S: PixelSource + ?Sized,
    C: CancelSignal + ?Sized,
{
    let dimensions = source.dimensions();
    let target = options
        .constraints()
        .target_dimensions(dimensions, options.pixel_ratio());

    match target {
        Some((width, height)) => {
            log::debug!(
                "resampling {}x{} to {}x{} before render",
                dimensions.0,
                dimensions.1,
                width,
                height
            );
            let resized = resize(source, width, height);
            render_engines::generate(&resized, options, cancel)
        }
        None => render_engines::generate(source, options, cancel),
    }
}
