//! Import and deletion lifecycle
//!
//! Record mutations and file operations are not transactional with each
//! other; a copy that succeeds before an insert fails leaves an orphaned
//! managed file behind. Deletion therefore releases files best-effort
//! after the record is gone.

use crate::{GameDatabase, GameRecord, LibraryError};
use flashvault_assets::{AssetError, AssetStore, MEDIA_EXTENSION};
use std::path::Path;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "library.db";

/// Result of clearing the whole library
#[derive(Debug, Default, Clone, Copy)]
pub struct ClearSummary {
    pub records_removed: usize,
    pub assets_released: usize,
    pub covers_released: usize,
}

/// Catalog plus managed asset storage
pub struct Library {
    db: GameDatabase,
    assets: AssetStore,
}

impl Library {
    /// Open the library rooted at a data directory
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let data_dir = data_dir.as_ref();
        let assets = AssetStore::new(data_dir)?;
        let db = GameDatabase::open(data_dir.join(DATABASE_FILE))?;

        Ok(Self { db, assets })
    }

    /// The underlying catalog
    pub fn db(&self) -> &GameDatabase {
        &self.db
    }

    /// The managed asset store
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Look up a game, treating a missing id as an error
    pub fn get_game(&self, id: i64) -> Result<GameRecord, LibraryError> {
        self.db.get_game(id)?.ok_or(LibraryError::GameNotFound(id))
    }

    /// Import a game file and create its record
    ///
    /// The file is copied into the managed games directory. When the copy
    /// itself fails the original path is referenced directly rather than
    /// losing the import; a missing source is still an error. A thumbnail,
    /// when given, must already be a managed (or default) path.
    pub fn add_game(
        &self,
        source: &Path,
        title: Option<&str>,
        thumbnail: Option<&Path>,
    ) -> Result<GameRecord, LibraryError> {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Untitled".to_string()),
        };

        let asset_path = match self.assets.import_asset(source, &title) {
            Ok(path) => path,
            Err(e @ AssetError::InvalidInput(_)) => return Err(e.into()),
            Err(AssetError::Io(e)) => {
                tracing::warn!(
                    "Could not copy {} into managed folder ({}), referencing original location",
                    source.display(),
                    e
                );
                source.to_path_buf()
            }
        };

        let thumbnail = thumbnail.map(|p| p.to_string_lossy().into_owned());
        let id = self.db.add_game(
            &title,
            &asset_path.to_string_lossy(),
            thumbnail.as_deref(),
        )?;

        tracing::info!("Added game '{}' (id {})", title, id);
        self.db.get_game(id)?.ok_or(LibraryError::GameNotFound(id))
    }

    /// Import every media file in a folder, skipping ones already cataloged
    ///
    /// A file is considered already imported when the managed path its
    /// title maps to exists as a record, so re-running on the same folder
    /// is idempotent. Returns the number of games imported.
    pub fn import_directory(&self, folder: &Path) -> Result<usize, LibraryError> {
        if !folder.is_dir() {
            return Err(LibraryError::PathNotFound(folder.to_path_buf()));
        }

        let mut imported = 0;

        for entry in std::fs::read_dir(folder)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let is_media = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(MEDIA_EXTENSION));
            if !is_media {
                continue;
            }

            let title = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            };

            let candidate = self.assets.asset_candidate(&title, MEDIA_EXTENSION);
            if self
                .db
                .get_game_by_asset_path(&candidate.to_string_lossy())?
                .is_some()
            {
                tracing::debug!("Skipping already-imported {}", path.display());
                continue;
            }

            self.add_game(&path, Some(&title), None)?;
            imported += 1;
        }

        tracing::info!("Imported {} games from {}", imported, folder.display());
        Ok(imported)
    }

    /// Record a play event
    pub fn record_play(&self, id: i64) -> Result<(), LibraryError> {
        self.db.record_play(id)
    }

    /// Install a cover image from a local file
    ///
    /// The previous custom cover, if any, is released; the shared default
    /// cover is never touched.
    pub fn set_cover_from_file(&self, id: i64, source: &Path) -> Result<String, LibraryError> {
        let game = self.db.get_game(id)?.ok_or(LibraryError::GameNotFound(id))?;
        let managed = self.assets.import_cover(source, &game.title)?;
        let managed = managed.to_string_lossy().into_owned();

        self.db.update_thumbnail(id, Some(&managed))?;
        if let Some(old) = game.thumbnail_path {
            self.assets.release(Path::new(&old));
        }

        Ok(managed)
    }

    /// Point a game at an already-managed cover path
    pub fn set_cover_path(&self, id: i64, cover: &Path) -> Result<(), LibraryError> {
        let game = self.db.get_game(id)?.ok_or(LibraryError::GameNotFound(id))?;

        self.db
            .update_thumbnail(id, Some(&cover.to_string_lossy()))?;
        if let Some(old) = game.thumbnail_path {
            if Path::new(&old) != cover {
                self.assets.release(Path::new(&old));
            }
        }

        Ok(())
    }

    /// Drop the custom cover so the default style applies again
    pub fn clear_cover(&self, id: i64) -> Result<(), LibraryError> {
        let game = self.db.get_game(id)?.ok_or(LibraryError::GameNotFound(id))?;

        self.db.update_thumbnail(id, None)?;
        if let Some(old) = game.thumbnail_path {
            self.assets.release(Path::new(&old));
        }

        Ok(())
    }

    /// Delete a game record and release its managed files
    pub fn remove_game(&self, id: i64) -> Result<(), LibraryError> {
        let (asset_path, thumbnail_path) = self.db.delete_game(id)?;

        self.assets.release(Path::new(&asset_path));
        if let Some(thumb) = thumbnail_path {
            self.assets.release(Path::new(&thumb));
        }

        tracing::info!("Removed game id {}", id);
        Ok(())
    }

    /// Delete every record and release every owned file
    pub fn clear_library(&self) -> Result<ClearSummary, LibraryError> {
        let removed = self.db.delete_all()?;
        let mut summary = ClearSummary {
            records_removed: removed.len(),
            ..Default::default()
        };

        for game in &removed {
            let asset = Path::new(&game.asset_path);
            if self.assets.is_managed(asset) && asset.exists() {
                summary.assets_released += 1;
            }
            self.assets.release(asset);

            if let Some(thumb) = &game.thumbnail_path {
                let thumb = Path::new(thumb);
                if self.assets.is_managed(thumb)
                    && thumb != self.assets.default_cover_path()
                    && thumb.exists()
                {
                    summary.covers_released += 1;
                }
                self.assets.release(thumb);
            }
        }

        tracing::info!(
            "Cleared library: {} records, {} assets, {} covers",
            summary.records_removed,
            summary.assets_released,
            summary.covers_released
        );
        Ok(summary)
    }
}
