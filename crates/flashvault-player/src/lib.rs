//! External Flash player process launching for FlashVault
//!
//! The core hands the player executable a media file path and reports
//! whether the spawn succeeded; play-count bookkeeping stays with the
//! catalog.

mod launcher;

pub use launcher::{LaunchResult, PlayerLauncher};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player executable not found: {0}")]
    PlayerNotFound(PathBuf),

    #[error("Media file not found: {0}")]
    AssetNotFound(PathBuf),

    #[error("Launch failed: {0}")]
    LaunchFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
