//! Deterministic thumbnail synthesis for FlashVault
//!
//! Game cards show either a custom cover, the shared default cover, or a
//! synthesized placeholder with the game title on a gradient. Synthesis is
//! fully deterministic: the same title and style always produce the same
//! pixels, so renders can be cached or compared byte for byte.

mod font;
mod render;

pub use render::{
    TARGET_HEIGHT, TARGET_WIDTH, ensure_default_cover, save_png, scale_to_fit, synthesize,
    thumbnail_for,
};

pub use flashvault_config::ThumbnailStyle;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
