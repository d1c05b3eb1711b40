use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crossterm::style::{Color, ContentStyle};
use csolver::{
    generator::{LOOP_DIVISOR, SEPARATION_DIVISOR},
    Strategy,
};
use ron::{self, extensions::Extensions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SETTINGS: &str = include_str!("./default_settings.ron");

const DEFAULT_WIDTH: usize = 41;
const DEFAULT_HEIGHT: usize = 21;
const DEFAULT_ANIMATION_DELAY_MS: u64 = 30;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Failed to write settings file: {0}")]
    Write(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub wall: Color,
    pub walkable: Color,
    pub start: Color,
    pub finish: Color,
    pub visited: Color,
    pub frontier: Color,
    pub path: Color,
    pub current: Color,
}

impl ColorScheme {
    fn style(color: Color) -> ContentStyle {
        ContentStyle {
            foreground_color: Some(color),
            background_color: None,
            ..Default::default()
        }
    }

    pub fn walls(&self) -> ContentStyle {
        Self::style(self.wall)
    }

    pub fn walkables(&self) -> ContentStyle {
        Self::style(self.walkable)
    }

    pub fn starts(&self) -> ContentStyle {
        Self::style(self.start)
    }

    pub fn finishes(&self) -> ContentStyle {
        Self::style(self.finish)
    }

    pub fn visiteds(&self) -> ContentStyle {
        Self::style(self.visited)
    }

    pub fn frontiers(&self) -> ContentStyle {
        Self::style(self.frontier)
    }

    pub fn paths(&self) -> ContentStyle {
        Self::style(self.path)
    }

    pub fn currents(&self) -> ContentStyle {
        Self::style(self.current)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            wall: Color::DarkGrey,
            walkable: Color::White,
            start: Color::Green,
            finish: Color::Red,
            visited: Color::Blue,
            frontier: Color::Yellow,
            path: Color::Cyan,
            current: Color::Magenta,
        }
    }
}

/// User settings, every value is optional and falls back to a default.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub heuristic_visible: Option<bool>,
    #[serde(default)]
    pub loop_divisor: Option<usize>,
    #[serde(default)]
    pub separation_divisor: Option<usize>,
    #[serde(default)]
    pub animation_delay_ms: Option<u64>,
    #[serde(default)]
    pub colors: Option<ColorScheme>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("msolver").join("settings.ron"))
    }

    fn options() -> ron::Options {
        ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
    }

    /// Loads settings from `path`, the bundled defaults are written there first when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(settings_string) => Ok(Self::options().from_str(&settings_string)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("creating default settings at {:?}", path);
                Self::reset_config(path)?;
                Ok(Self::options().from_str(DEFAULT_SETTINGS)?)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn reset_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let string = Self::options().to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, string)?;
        Ok(())
    }

    pub fn set_width(mut self, value: usize) -> Self {
        self.width = Some(value);
        self
    }

    pub fn get_width(&self) -> usize {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn set_height(mut self, value: usize) -> Self {
        self.height = Some(value);
        self
    }

    pub fn get_height(&self) -> usize {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    pub fn set_strategy(mut self, value: Strategy) -> Self {
        self.strategy = Some(value);
        self
    }

    pub fn get_strategy(&self) -> Strategy {
        self.strategy.unwrap_or_default()
    }

    /// Defaults to what the strategy itself prefers.
    pub fn get_heuristic_visible(&self, strategy: Strategy) -> bool {
        self.heuristic_visible
            .unwrap_or_else(|| strategy.default_heuristic_visible())
    }

    pub fn get_loop_divisor(&self) -> usize {
        self.loop_divisor.filter(|&d| d > 0).unwrap_or(LOOP_DIVISOR)
    }

    pub fn get_separation_divisor(&self) -> usize {
        self.separation_divisor
            .filter(|&d| d > 0)
            .unwrap_or(SEPARATION_DIVISOR)
    }

    pub fn get_animation_delay_ms(&self) -> u64 {
        self.animation_delay_ms
            .unwrap_or(DEFAULT_ANIMATION_DELAY_MS)
    }

    pub fn get_colors(&self) -> ColorScheme {
        self.colors.clone().unwrap_or_default()
    }
}
