//! Managed directory tree and collision-safe naming

use crate::AssetError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of playable media
pub const MEDIA_EXTENSION: &str = "swf";

/// Cover image extensions accepted as-is; anything else becomes `jpg`
pub const COVER_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// File name of the shared default cover inside the covers directory
pub const DEFAULT_COVER_NAME: &str = "default_cover.png";

const GAMES_DIR: &str = ".games";
const COVERS_DIR: &str = ".covers";

/// Managed storage for game files and cover images
pub struct AssetStore {
    games_dir: PathBuf,
    covers_dir: PathBuf,
    default_cover: PathBuf,
}

impl AssetStore {
    /// Open the managed tree under a data directory, creating it if needed
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let data_dir = data_dir.as_ref();
        let games_dir = data_dir.join(GAMES_DIR);
        let covers_dir = data_dir.join(COVERS_DIR);

        fs::create_dir_all(&games_dir)?;
        fs::create_dir_all(&covers_dir)?;

        let default_cover = covers_dir.join(DEFAULT_COVER_NAME);

        Ok(Self {
            games_dir,
            covers_dir,
            default_cover,
        })
    }

    /// Managed games directory
    pub fn games_dir(&self) -> &Path {
        &self.games_dir
    }

    /// Managed covers directory
    pub fn covers_dir(&self) -> &Path {
        &self.covers_dir
    }

    /// Path of the shared default cover (the file itself may not exist yet)
    pub fn default_cover_path(&self) -> &Path {
        &self.default_cover
    }

    /// Whether a path lies inside one of the managed directories
    pub fn is_managed(&self, path: &Path) -> bool {
        path.starts_with(&self.games_dir) || path.starts_with(&self.covers_dir)
    }

    /// Copy a game file into the managed games directory
    ///
    /// The managed name is derived from `display_name`; an existing file
    /// with that name gets an incrementing `_1`, `_2`, ... suffix instead
    /// of being overwritten.
    pub fn import_asset(&self, source: &Path, display_name: &str) -> Result<PathBuf, AssetError> {
        if !source.is_file() {
            return Err(AssetError::InvalidInput(source.to_path_buf()));
        }

        let stem = sanitize_stem(display_name);
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| MEDIA_EXTENSION.to_string());

        let target = unique_path(&self.games_dir, &stem, &ext);
        fs::copy(source, &target)?;

        tracing::info!("Imported {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// Copy a cover image into the managed covers directory
    ///
    /// Same collision policy as [`import_asset`](Self::import_asset), with
    /// the extension normalized against the cover allow-list.
    pub fn import_cover(&self, source: &Path, display_name: &str) -> Result<PathBuf, AssetError> {
        if !source.is_file() {
            return Err(AssetError::InvalidInput(source.to_path_buf()));
        }

        let stem = format!("{}_cover", sanitize_stem(display_name));
        let ext = normalize_cover_ext(source.extension().and_then(|e| e.to_str()));

        let target = unique_path(&self.covers_dir, &stem, &ext);
        fs::copy(source, &target)?;

        tracing::info!("Saved cover {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// Write downloaded cover bytes into the managed covers directory
    pub fn write_cover(
        &self,
        bytes: &[u8],
        display_name: &str,
        ext: &str,
    ) -> Result<PathBuf, AssetError> {
        let stem = format!("{}_cover", sanitize_stem(display_name));
        let ext = normalize_cover_ext(Some(ext));

        let target = unique_path(&self.covers_dir, &stem, &ext);
        fs::write(&target, bytes)?;

        tracing::info!("Wrote cover bytes to {}", target.display());
        Ok(target)
    }

    /// Delete a managed file, best effort
    ///
    /// Paths outside the managed directories and the shared default cover
    /// are left alone. Removal failures are logged and swallowed so a
    /// locked or already-missing file never blocks the caller.
    pub fn release(&self, path: &Path) {
        if path == self.default_cover {
            return;
        }
        if !self.is_managed(path) {
            tracing::debug!("Not releasing unmanaged path {}", path.display());
            return;
        }
        if !path.exists() {
            return;
        }

        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }

    /// The managed path an import of `display_name` would use before any
    /// collision suffix is applied
    pub fn asset_candidate(&self, display_name: &str, ext: &str) -> PathBuf {
        self.games_dir
            .join(format!("{}.{}", sanitize_stem(display_name), ext))
    }
}

/// Reduce a display name to a filesystem-safe stem
fn sanitize_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if stem.is_empty() {
        "game".to_string()
    } else {
        stem
    }
}

/// First free `stem.ext`, `stem_1.ext`, `stem_2.ext`, ... in `dir`
fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut target = dir.join(format!("{}.{}", stem, ext));
    let mut counter = 1;

    while target.exists() {
        target = dir.join(format!("{}_{}.{}", stem, counter, ext));
        counter += 1;
    }

    target
}

fn normalize_cover_ext(ext: Option<&str>) -> String {
    match ext {
        Some(e) => {
            let e = e.to_lowercase();
            if COVER_EXTENSIONS.contains(&e.as_str()) {
                e
            } else {
                "jpg".to_string()
            }
        }
        None => "jpg".to_string(),
    }
}
