//! Configuration management
//!
//! Load and save render defaults to a TOML config file. Colors are stored as
//! hex strings and parsed when the config is turned into [`Options`].

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color_space::Color;
use crate::error::{AsciiError, Result};
use crate::gradient::DEFAULT_GRADIENT;
use crate::options::{Options, PixelRatio, DEFAULT_MAX_CELLS};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderPreferences,
    pub limits: LimitPreferences,
}

impl Config {
    /// Load configuration from the default location, or defaults when there
    /// is no file yet
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| AsciiError::Config(e.to_string()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| AsciiError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "glyphcast", "glyphcast") {
            proj_dirs.config_dir().join("config.toml")
        } else {
            // Fallback to current directory
            PathBuf::from("glyphcast.toml")
        }
    }

    /// Build render options from these preferences
    pub fn to_options(&self) -> Result<Options> {
        let render = &self.render;
        let limits = &self.limits;

        Ok(Options::new()
            .with_pixel_ratio(render.pixel_ratio.x, render.pixel_ratio.y)
            .with_chars(&render.chars)
            .with_face(parse_optional_color(render.face.as_deref())?)
            .with_background(parse_optional_color(render.background.as_deref())?)
            .with_transparent_background(render.transparent_background)
            .with_original_face(render.original_color)
            .with_max_width(limits.max_width)
            .with_max_height(limits.max_height)
            .with_compression(limits.compression))
    }
}

/// Parse a hex color such as `#1e90ff`
pub fn parse_color(text: &str) -> Result<Color> {
    Color::from_hex(text).ok_or_else(|| AsciiError::InvalidColor(text.to_string()))
}

fn parse_optional_color(text: Option<&str>) -> Result<Option<Color>> {
    text.map(parse_color).transpose()
}

/// Glyph and color preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPreferences {
    /// Gradient, darkest glyph first
    pub chars: String,
    pub pixel_ratio: PixelRatio,
    pub face: Option<String>,
    pub background: Option<String>,
    pub transparent_background: bool,
    pub original_color: bool,
}

impl Default for RenderPreferences {
    fn default() -> Self {
        Self {
            chars: DEFAULT_GRADIENT.to_string(),
            pixel_ratio: PixelRatio::default(),
            face: None,
            background: None,
            transparent_background: false,
            original_color: false,
        }
    }
}

/// Size limits, in glyph cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitPreferences {
    pub max_width: u32,
    pub max_height: u32,
    pub compression: u8,
    /// Abandon renders that take longer than this
    pub timeout_ms: Option<u64>,
}

impl Default for LimitPreferences {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CELLS,
            max_height: DEFAULT_MAX_CELLS,
            compression: 0,
            timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_format::PixelFormat;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.chars, DEFAULT_GRADIENT);
        assert_eq!(config.limits.max_width, DEFAULT_MAX_CELLS);
        assert!(!config.render.original_color);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.render.face = Some("#ff8800".to_string());
        config.render.pixel_ratio = PixelRatio { x: 2, y: 4 };
        config.limits.timeout_ms = Some(1500);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[render]\nchars = \"#. \"\n").unwrap();
        assert_eq!(parsed.render.chars, "#. ");
        assert_eq!(parsed.limits, LimitPreferences::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.render.background = Some("#102030".to_string());

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "render = 5").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AsciiError::Config(_))));
    }

    #[test]
    fn test_to_options() {
        let mut config = Config::default();
        config.render.face = Some("#f00".to_string());
        config.render.background = Some("#000000".to_string());
        config.limits.compression = 20;

        let options = config.to_options().unwrap().validated();
        assert_eq!(options.color().face(), Some(Color::rgb(255, 0, 0)));
        assert_eq!(options.color().format(), Some(PixelFormat::Rgb8));
        assert_eq!(options.constraints().compression, 20);
    }

    #[test]
    fn test_hex_variants() {
        assert!(matches!(parse_color("#0a0b0c").unwrap(), Color::Rgb([10, 11, 12])));
        assert!(matches!(parse_color("#0a0b0c80").unwrap(), Color::Rgba([10, 11, 12, 0x80])));
        assert!(matches!(parse_color("#123456789abc").unwrap(), Color::Rgb16(_)));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let mut config = Config::default();
        config.render.face = Some("#zzz".to_string());
        assert!(matches!(config.to_options(), Err(AsciiError::InvalidColor(_))));
    }
}
