//! Glyphcast - raster glyph art renderer
//!
//! Turns an image into a new image made of glyphs: each sample of the source
//! picks a character from a brightness gradient, and the characters are drawn
//! with a fixed bitmap face in flat, gray or original colors.

pub mod cancel;
pub mod color_config;
pub mod color_space;
pub mod config;
pub mod error;
pub mod generator;
pub mod gradient;
pub mod image_loader;
pub mod options;
pub mod pixel_format;
pub mod render_engines;
pub mod resize;
pub mod worker;

// Re-export commonly used types
pub use cancel::{CancelSignal, CancelToken};
pub use color_config::ColorConfig;
pub use color_space::Color;
pub use config::Config;
pub use error::{AsciiError, Result};
pub use generator::Generator;
pub use gradient::GradientTable;
pub use options::{Options, PixelRatio, SizeConstraints};
pub use pixel_format::PixelFormat;
pub use render_engines::{generate, PixelSource};
