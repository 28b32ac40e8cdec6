//! Cover image acquisition for FlashVault
//!
//! Covers come from a local file the user picked, or from a URL produced
//! by a picking mechanism the core does not depend on. Remote acquisition
//! always degrades to "no custom cover" on failure; it never blocks or
//! aborts an enclosing import.

mod fetcher;
mod picker;

pub use fetcher::CoverFetcher;
pub use picker::{CandidateSource, CoverPicker, PickerState};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Invalid picker transition: {0}")]
    InvalidTransition(String),

    #[error("Asset error: {0}")]
    Asset(#[from] flashvault_assets::AssetError),
}
