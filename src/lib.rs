pub mod commands;
pub mod logging;
pub mod render;
pub mod settings;
pub mod storage;

use std::io;

use csolver::{GeneratorError, GridError, SolveError};
use thiserror::Error;

use settings::SettingsError;
use storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Maze generation failed: {0}")]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("Search failed: {0}")]
    Solve(#[from] SolveError),
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("Cannot find the config directory, use --config to pick a settings file")]
    NoConfigDir,
}
