//! Configuration file handling for glyphgrid.
//!
//! Loads configuration from `<config dir>/glyphgrid/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::glyph::{FontStyle, DEFAULT_FALLBACK_FAMILIES};
use crate::pixel::ToneMap;

/// Configuration file structure for glyphgrid.
/// Loaded from the platform config dir (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub tone: ToneMap,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FontConfig {
    /// Requested family; unset means the generic monospace fallback
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_font_size")]
    pub size: u32,
    #[serde(default)]
    pub style: FontStyle,
    /// Extra directories scanned for font files, before the platform ones
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
    /// Monospace families tried in order when the requested font is unusable
    #[serde(default = "default_fallback")]
    pub fallback: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name: None,
            size: default_font_size(),
            style: FontStyle::default(),
            search_dirs: Vec::new(),
            fallback: default_fallback(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    /// Convert the input to greyscale first
    #[serde(default)]
    pub grey: bool,
    /// Output scale; glyphs render at `font.size / scale` pixels
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Canvas and page background grey level
    #[serde(default = "default_background")]
    pub background: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grey: false,
            scale: default_scale(),
            background: default_background(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// 0 = silent, 1 = errors, 2 = errors and warnings, 3 = everything
    #[serde(default = "default_log_mode")]
    pub mode: u8,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            mode: default_log_mode(),
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.mode {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            _ => log::LevelFilter::Info,
        }
    }
}

fn default_font_size() -> u32 {
    8
}

fn default_fallback() -> Vec<String> {
    DEFAULT_FALLBACK_FAMILIES.iter().map(|s| s.to_string()).collect()
}

fn default_scale() -> f32 {
    1.0
}

fn default_background() -> u8 {
    0x11
}

fn default_log_mode() -> u8 {
    3
}

/// Written by `glyphgrid config init`.
pub const DEFAULT_CONFIG: &str = r#"# glyphgrid configuration

[font]
# Font family; leave unset for a generic monospaced font
# name = "DejaVu Sans Mono"
# Font size in pixels
size = 8
# Style: regular, bold, italic, bold-italic
style = "regular"
# Extra directories to search for .ttf/.otf files
# search_dirs = ["~/my-fonts"]
# Monospaced families tried when the chosen font is missing or proportional
# fallback = ["DejaVu Sans Mono", "Liberation Mono"]

[render]
# Convert the input to greyscale
grey = false
# Output scale (glyphs render at size / scale pixels, minimum 4)
scale = 1.0
# Background grey level (0-255)
background = 17

[tone]
# Contrast and brightness applied before matching
scale = 0.75
offset = 64

[log]
# 0 = silent, 1 = errors, 2 = errors and warnings, 3 = all
mode = 3
"#;

impl Config {
    /// Load configuration from a file path.
    /// Without a path, the default location is used and a missing file
    /// yields the default config. An explicit path must exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            config.validate()?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else if explicit {
            Err(ConfigError::IoError {
                path,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject values no conversion can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font.size == 0 {
            return Err(ConfigError::Invalid {
                field: "font.size",
                message: "must be a positive integer".to_string(),
            });
        }
        if !(self.render.scale.is_finite() && self.render.scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "render.scale",
                message: format!("must be a positive number, got {}", self.render.scale),
            });
        }
        if !self.tone.scale.is_finite() {
            return Err(ConfigError::Invalid {
                field: "tone.scale",
                message: format!("must be a finite number, got {}", self.tone.scale),
            });
        }
        if self.log.mode > 3 {
            return Err(ConfigError::Invalid {
                field: "log.mode",
                message: format!("must be between 0 and 3, got {}", self.log.mode),
            });
        }
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Invalid { field, message } => {
                write!(f, "Invalid config value '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyphgrid").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyphgrid/config.toml")
        })
}
