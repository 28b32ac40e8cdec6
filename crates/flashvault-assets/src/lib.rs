//! Managed asset storage for FlashVault
//!
//! Imported game files and cover images are copied into hidden directories
//! under the data dir and given stable, collision-free names. Files are
//! never referenced in place by this crate; the import/delete lifecycle
//! owns the managed copies.

mod store;

pub use store::{AssetStore, COVER_EXTENSIONS, DEFAULT_COVER_NAME, MEDIA_EXTENSION};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Source file not found or not readable: {0}")]
    InvalidInput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
