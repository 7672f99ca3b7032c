//! Configuration file management
//!
//! Loads TOML configuration files and provides render settings.
//! Default config path: ~/.config/ttfblit/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::blend::BlendMode;
use crate::font::depth::DepthRamp;
use crate::font::{FontOptions, SizeMode};
use crate::surface::PixelFormat;
use crate::utils::parse_hex_color;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font settings
    pub font: FontConfig,
    /// Compositing settings
    pub render: RenderConfig,
    /// Output surface settings
    pub surface: SurfaceConfig,
}

/// Font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file path (searches known system paths if empty)
    pub path: String,
    /// Pixel size; also the baseline offset from the line origin
    pub size: u32,
    /// Minimum advance for narrow characters (doubled for wide ones)
    pub mono_width: u8,
    /// Face index inside a TTC/OTC collection
    pub index: u32,
    /// "em" (em square = size) or "pixel_height" (ascent-descent = size)
    pub size_mode: SizeMode,
}

/// Compositing settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// "alpha" | "color_key" | "opaque"
    pub blend: BlendMode,
    /// "linear" | "sharp"
    pub ramp: DepthRamp,
    /// "rgb565" | "rgb555"
    pub format: PixelFormat,
}

/// Output surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: usize,
    pub height: usize,
    /// Background color (RRGGBB)
    pub background: String,
    /// Extra pixels between lines
    pub line_spacing: u32,
    /// Left/top margin in pixels
    pub margin: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            size: 16,
            mono_width: 8,
            index: 0,
            size_mode: SizeMode::Em,
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 200,
            background: "000000".to_string(),
            line_spacing: 4,
            margin: 4,
        }
    }
}

impl Config {
    /// Get the path that would be used for loading config
    ///
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. TTFBLIT_CONFIG environment variable
        if let Ok(path) = std::env::var("TTFBLIT_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/ttfblit/config.toml
        let config_path = default_config_path()?;
        config_path.exists().then_some(config_path)
    }

    /// Load configuration with priority:
    /// 1. TTFBLIT_CONFIG environment variable
    /// 2. ~/.config/ttfblit/config.toml (user config)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render policy for `Font` construction
    pub fn font_options(&self) -> FontOptions {
        FontOptions {
            size_mode: self.font.size_mode,
            blend: self.render.blend,
            ramp: self.render.ramp,
        }
    }

    /// Background color packed in the configured format
    ///
    /// Falls back to black on an unparseable color.
    pub fn background_color(&self) -> u16 {
        let (r, g, b) = parse_hex_color(&self.surface.background).unwrap_or_else(|| {
            warn!("Invalid background color: {:?}", self.surface.background);
            (0, 0, 0)
        });
        self.render.format.map_rgb(r, g, b)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ttfblit").join("config.toml"))
}
