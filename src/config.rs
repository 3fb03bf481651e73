//! Typed configuration options backed by a TOML table.
//!
//! Every option carries its key, default value and (for integers) the range it
//! is clamped to. `Config` stores whatever was read from disk; lookups fall
//! back to a caller-supplied value when a key is unset or has the wrong type.
//! The grid never reads `Config` directly: it receives a `GridConfig` snapshot.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::debug;

use crate::models::Color;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config has no file path to save to")]
    NoPath,
}

/// A value type that can live in the config table.
pub trait OptionValue: Clone {
    fn from_toml(value: &toml::Value) -> Option<Self>;
    fn to_toml(&self) -> toml::Value;

    fn clamp_to(self, _min: &Self, _max: &Self) -> Self {
        self
    }
}

impl OptionValue for i64 {
    fn from_toml(value: &toml::Value) -> Option<Self> {
        value.as_integer()
    }

    fn to_toml(&self) -> toml::Value {
        toml::Value::Integer(*self)
    }

    fn clamp_to(self, min: &Self, max: &Self) -> Self {
        self.clamp(*min, *max)
    }
}

impl OptionValue for bool {
    fn from_toml(value: &toml::Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_toml(&self) -> toml::Value {
        toml::Value::Boolean(*self)
    }
}

impl OptionValue for Color {
    fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(s) => Color::parse_hex(s),
            toml::Value::Integer(rgb) => u32::try_from(*rgb).ok().map(Color::from_rgb),
            _ => None,
        }
    }

    fn to_toml(&self) -> toml::Value {
        toml::Value::String(self.to_hex())
    }
}

/// Declaration of a single option.
#[derive(Debug, Clone)]
pub struct ConfigOption<T> {
    pub key: &'static str,
    pub default: T,
    pub bounds: Option<(T, T)>,
}

impl<T> ConfigOption<T> {
    pub const fn new(key: &'static str, default: T) -> Self {
        Self {
            key,
            default,
            bounds: None,
        }
    }

    pub const fn ranged(key: &'static str, default: T, min: T, max: T) -> Self {
        Self {
            key,
            default,
            bounds: Some((min, max)),
        }
    }
}

pub const INITIAL_SCREENSHOT_AMOUNT_PER_ROW: ConfigOption<i64> =
    ConfigOption::ranged("initial_screenshot_amount_per_row", 4, 2, 8);
pub const SCREEN_SCROLL_SPEED: ConfigOption<i64> =
    ConfigOption::ranged("screen_scroll_speed", 10, 1, 50);
pub const SCREENSHOT_ELEMENT_BACKGROUND_OPACITY: ConfigOption<i64> =
    ConfigOption::ranged("screenshot_element_background_opacity", 100, 0, 100);
pub const RENDER_SCREENSHOT_ELEMENT_FONT_SHADOW: ConfigOption<bool> =
    ConfigOption::new("render_screenshot_element_font_shadow", true);
pub const SCREENSHOT_ELEMENT_TEXT_COLOR: ConfigOption<Color> =
    ConfigOption::new("screenshot_element_text_color", Color::from_rgb(0xFFFFFF));
pub const PROMPT_WHEN_DELETING_SCREENSHOT: ConfigOption<bool> =
    ConfigOption::new("prompt_when_deleting_screenshot", true);
pub const LIST_INVERTED_ORDER: ConfigOption<bool> =
    ConfigOption::new("list_inverted_order", false);

/// Option values read from (and written back to) a TOML file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: Option<PathBuf>,
    values: toml::Table,
}

impl Config {
    /// A config with nothing set; every lookup returns its fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the default config path based on XDG directories.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs = ProjectDirs::from("", "", "shotview").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Loads the config at the default XDG location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path()?)
    }

    /// Loads `path`. A missing file is an empty config bound to that path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "No config file, using defaults");
                return Ok(Self {
                    path: Some(path.to_path_buf()),
                    values: toml::Table::new(),
                });
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let values = text
            .parse::<toml::Table>()
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(?path, keys = values.len(), "Loaded config");

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The stored value clamped to the option's bounds, or the option default.
    pub fn get<T: OptionValue>(&self, option: &ConfigOption<T>) -> T {
        self.get_or_fallback(option, option.default.clone())
    }

    /// The stored value clamped to the option's bounds, or `fallback` when the
    /// key is unset or holds the wrong type.
    pub fn get_or_fallback<T: OptionValue>(&self, option: &ConfigOption<T>, fallback: T) -> T {
        let Some(value) = self.values.get(option.key).and_then(T::from_toml) else {
            return fallback;
        };
        match &option.bounds {
            Some((min, max)) => value.clamp_to(min, max),
            None => value,
        }
    }

    pub fn set<T: OptionValue>(&mut self, option: &ConfigOption<T>, value: T) {
        let value = match &option.bounds {
            Some((min, max)) => value.clamp_to(min, max),
            None => value,
        };
        self.values.insert(option.key.to_string(), value.to_toml());
    }

    /// Writes the config back to the file it was loaded from.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.as_deref().ok_or(ConfigError::NoPath)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let text = toml::to_string(&self.values)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The option values the grid and its tiles consume.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub columns: usize,
    pub scroll_speed: i32,
    /// Tile background opacity in percent.
    pub background_opacity: u8,
    pub text_color: Color,
    pub font_shadow: bool,
    pub inverted_order: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            scroll_speed: 10,
            background_opacity: 100,
            text_color: Color::WHITE,
            font_shadow: true,
            inverted_order: false,
        }
    }
}

impl GridConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            columns: config.get_or_fallback(&INITIAL_SCREENSHOT_AMOUNT_PER_ROW, 4) as usize,
            scroll_speed: config.get_or_fallback(&SCREEN_SCROLL_SPEED, 10) as i32,
            background_opacity: config.get(&SCREENSHOT_ELEMENT_BACKGROUND_OPACITY) as u8,
            text_color: config.get(&SCREENSHOT_ELEMENT_TEXT_COLOR),
            font_shadow: config.get(&RENDER_SCREENSHOT_ELEMENT_FONT_SHADOW),
            inverted_order: config.get(&LIST_INVERTED_ORDER),
        }
    }
}
