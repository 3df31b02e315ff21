//! Image loading and saving
//!
//! Only the formats compiled into the `image` dependency are accepted:
//! PNG, JPEG and WebP.

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat, ImageReader};

use crate::error::{AsciiError, Result};

/// Get supported image format extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "webp"]
}

/// Check if a file extension is a supported image format
pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            supported_extensions().iter().any(|&e| e == ext_lower)
        })
        .unwrap_or(false)
}

fn check_extension(path: &Path) -> Result<()> {
    if is_supported_format(path) {
        Ok(())
    } else {
        Err(AsciiError::UnsupportedFormat(path.display().to_string()))
    }
}

/// Load an image from a file path
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    check_extension(path)?;
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    log::debug!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Load an image from bytes, sniffing the format from its magic number
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    match reader.format() {
        Some(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) => Ok(reader.decode()?),
        Some(other) => Err(AsciiError::UnsupportedFormat(format!("{:?}", other))),
        None => Err(AsciiError::UnsupportedFormat("unrecognized image data".to_string())),
    }
}

/// Encode `image` to `path`, picking the encoder from the extension.
///
/// JPEG only takes 8-bit gray or RGB, anything else is flattened to 8-bit
/// RGB first.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    check_extension(path)?;
    let format = ImageFormat::from_path(path)?;

    if format == ImageFormat::Jpeg && !matches!(image.color(), ColorType::L8 | ColorType::Rgb8) {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)?;
    } else {
        image.save_with_format(path, format)?;
    }

    log::debug!("saved {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

/// Get image dimensions
pub fn get_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    check_extension(path)?;
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma};
    use std::path::PathBuf;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        GrayImage::from_pixel(2, 1, Luma([200]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_is_supported_format() {
        assert!(is_supported_format(&PathBuf::from("test.png")));
        assert!(is_supported_format(&PathBuf::from("test.PNG")));
        assert!(is_supported_format(&PathBuf::from("test.JPEG")));
        assert!(is_supported_format(&PathBuf::from("test.webp")));
        assert!(!is_supported_format(&PathBuf::from("test.gif")));
        assert!(!is_supported_format(&PathBuf::from("test")));
    }

    #[test]
    fn test_load_rejects_extension() {
        let err = load_image(&PathBuf::from("picture.bmp")).unwrap_err();
        assert!(matches!(err, AsciiError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_from_bytes() {
        let image = load_image_from_bytes(&png_bytes()).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
    }

    #[test]
    fn test_load_from_bytes_rejects_garbage() {
        let err = load_image_from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AsciiError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_png_round_trip_keeps_16_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        let image = DynamicImage::ImageLuma16(ImageBuffer::from_pixel(3, 2, Luma([0x1234u16])));

        save_image(&image, &path).unwrap();
        let loaded = load_image(&path).unwrap();

        assert_eq!(loaded.as_luma16().unwrap().get_pixel(2, 1).0, [0x1234]);
        assert_eq!(get_image_dimensions(&path).unwrap(), (3, 2));
    }

    #[test]
    fn test_jpeg_flattens_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.jpg");
        let image = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(4, 4, image::LumaA([9u8, 128])));
        save_image(&image, &path).unwrap();
        assert!(load_image(&path).is_ok());

        let gray = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        save_image(&gray, &path.with_extension("jpeg")).unwrap();
    }
}
