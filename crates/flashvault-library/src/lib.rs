//! Game catalog storage and import lifecycle for FlashVault
//!
//! [`GameDatabase`] is the SQLite-backed catalog; [`Library`] composes it
//! with the managed asset store so imports, deletions, and bulk folder
//! scans keep records and files in step.

mod database;
mod library;

pub use database::{GameDatabase, GameRecord};
pub use library::{ClearSummary, DATABASE_FILE, Library};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Game not found: {0}")]
    GameNotFound(i64),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Asset error: {0}")]
    Asset(#[from] flashvault_assets::AssetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
