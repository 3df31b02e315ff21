//! Error types
//!
//! Defaulting of bad options is never an error; only cancellation and the
//! surrounding I/O glue can fail.

use image::DynamicImage;

/// Errors produced by glyphcast
#[derive(Debug, thiserror::Error)]
pub enum AsciiError {
    /// The render was cancelled between two scanlines.
    ///
    /// Carries the destination as drawn so far: finished rows are complete,
    /// the remaining rows hold only the background fill (or nothing).
    #[error("render cancelled")]
    Cancelled(Box<DynamicImage>),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("config error: {0}")]
    Config(String),
}

impl AsciiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AsciiError::Cancelled(_))
    }

    /// Take the partially drawn destination out of a cancellation
    pub fn into_partial(self) -> Option<DynamicImage> {
        match self {
            AsciiError::Cancelled(partial) => Some(*partial),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AsciiError>;
