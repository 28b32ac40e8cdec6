//! Game catalog using SQLite

use crate::LibraryError;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// A cataloged game
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub id: i64,
    pub title: String,
    pub asset_path: String,
    pub thumbnail_path: Option<String>,
    pub added_at: String,
    pub last_played_at: Option<String>,
    pub play_count: i64,
}

/// Game catalog manager
///
/// Every mutation commits before returning (rusqlite autocommit); there is
/// no caching layer, so each call reflects the latest committed state.
pub struct GameDatabase {
    conn: Connection,
}

impl GameDatabase {
    /// Open or create a database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let conn = Connection::open(path)?;

        let db = Self { conn };
        db.init_schema()?;

        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory()?;

        let db = Self { conn };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<(), LibraryError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                asset_path TEXT NOT NULL,
                thumbnail_path TEXT,
                added_at TEXT DEFAULT CURRENT_TIMESTAMP,
                last_played_at TEXT,
                play_count INTEGER DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_games_title ON games(title);
        "#,
        )?;

        Ok(())
    }

    /// Add a game to the catalog, returning its assigned id
    pub fn add_game(
        &self,
        title: &str,
        asset_path: &str,
        thumbnail_path: Option<&str>,
    ) -> Result<i64, LibraryError> {
        self.conn.execute(
            "INSERT INTO games (title, asset_path, thumbnail_path) VALUES (?1, ?2, ?3)",
            params![title, asset_path, thumbnail_path],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get a game by id
    pub fn get_game(&self, id: i64) -> Result<Option<GameRecord>, LibraryError> {
        let game = self
            .conn
            .query_row(
                "SELECT * FROM games WHERE id = ?1",
                params![id],
                Self::row_to_record,
            )
            .optional()?;

        Ok(game)
    }

    /// Get a game by its managed asset path
    pub fn get_game_by_asset_path(&self, path: &str) -> Result<Option<GameRecord>, LibraryError> {
        let game = self
            .conn
            .query_row(
                "SELECT * FROM games WHERE asset_path = ?1",
                params![path],
                Self::row_to_record,
            )
            .optional()?;

        Ok(game)
    }

    /// All games, sorted by title
    pub fn get_all_games(&self) -> Result<Vec<GameRecord>, LibraryError> {
        let mut stmt = self.conn.prepare("SELECT * FROM games ORDER BY title")?;

        let games = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(games)
    }

    /// Search games by title substring
    pub fn search_games(&self, query: &str) -> Result<Vec<GameRecord>, LibraryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM games WHERE title LIKE ?1 ORDER BY title")?;

        let pattern = format!("%{}%", query);
        let games = stmt
            .query_map(params![pattern], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(games)
    }

    /// Record a play event: bump the counter and stamp the time
    pub fn record_play(&self, id: i64) -> Result<(), LibraryError> {
        let changed = self.conn.execute(
            r#"UPDATE games
               SET last_played_at = CURRENT_TIMESTAMP,
                   play_count = play_count + 1
               WHERE id = ?1"#,
            params![id],
        )?;

        if changed == 0 {
            return Err(LibraryError::GameNotFound(id));
        }
        Ok(())
    }

    /// Overwrite a game's thumbnail path; `None` means "use the default"
    pub fn update_thumbnail(&self, id: i64, path: Option<&str>) -> Result<(), LibraryError> {
        let changed = self.conn.execute(
            "UPDATE games SET thumbnail_path = ?1 WHERE id = ?2",
            params![path, id],
        )?;

        if changed == 0 {
            return Err(LibraryError::GameNotFound(id));
        }
        Ok(())
    }

    /// Delete a game, returning the paths it owned so the caller can
    /// release the underlying files
    pub fn delete_game(&self, id: i64) -> Result<(String, Option<String>), LibraryError> {
        let paths = self
            .conn
            .query_row(
                "SELECT asset_path, thumbnail_path FROM games WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or(LibraryError::GameNotFound(id))?;

        self.conn
            .execute("DELETE FROM games WHERE id = ?1", params![id])?;

        Ok(paths)
    }

    /// Delete every game, returning what was removed for file cleanup
    pub fn delete_all(&self) -> Result<Vec<GameRecord>, LibraryError> {
        let games = self.get_all_games()?;
        self.conn.execute("DELETE FROM games", [])?;
        Ok(games)
    }

    /// Total number of games
    pub fn game_count(&self) -> Result<i64, LibraryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Sum of play counts across the catalog
    pub fn total_plays(&self) -> Result<i64, LibraryError> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(play_count), 0) FROM games",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Convert a row to a GameRecord
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<GameRecord> {
        Ok(GameRecord {
            id: row.get("id")?,
            title: row.get("title")?,
            asset_path: row.get("asset_path")?,
            thumbnail_path: row.get("thumbnail_path")?,
            added_at: row.get("added_at")?,
            last_played_at: row.get("last_played_at")?,
            play_count: row.get("play_count")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_creation() {
        let db = GameDatabase::in_memory().unwrap();
        assert_eq!(db.game_count().unwrap(), 0);
        assert!(db.get_all_games().unwrap().is_empty());
    }

    #[test]
    fn test_add_and_get_game() {
        let db = GameDatabase::in_memory().unwrap();

        let id = db
            .add_game("Bubble Trouble", "data/.games/Bubble_Trouble.swf", None)
            .unwrap();

        let game = db.get_game(id).unwrap().unwrap();
        assert_eq!(game.title, "Bubble Trouble");
        assert_eq!(game.play_count, 0);
        assert!(game.thumbnail_path.is_none());
        assert!(game.last_played_at.is_none());
        assert!(!game.added_at.is_empty());
    }

    #[test]
    fn test_list_sorted_by_title() {
        let db = GameDatabase::in_memory().unwrap();
        db.add_game("Zuma", "z.swf", None).unwrap();
        db.add_game("Alien Hominid", "a.swf", None).unwrap();
        db.add_game("Motherload", "m.swf", None).unwrap();

        let titles: Vec<_> = db
            .get_all_games()
            .unwrap()
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, vec!["Alien Hominid", "Motherload", "Zuma"]);
    }

    #[test]
    fn test_record_play_counts() {
        let db = GameDatabase::in_memory().unwrap();
        let id = db.add_game("Game", "g.swf", None).unwrap();

        for _ in 0..3 {
            db.record_play(id).unwrap();
        }

        let game = db.get_game(id).unwrap().unwrap();
        assert_eq!(game.play_count, 3);
        assert!(game.last_played_at.is_some());
    }

    #[test]
    fn test_record_play_unknown_id() {
        let db = GameDatabase::in_memory().unwrap();
        let err = db.record_play(999).unwrap_err();
        assert!(matches!(err, LibraryError::GameNotFound(999)));
    }

    #[test]
    fn test_update_thumbnail() {
        let db = GameDatabase::in_memory().unwrap();
        let id = db.add_game("Game", "g.swf", None).unwrap();

        db.update_thumbnail(id, Some("data/.covers/Game_cover.png"))
            .unwrap();
        let game = db.get_game(id).unwrap().unwrap();
        assert_eq!(
            game.thumbnail_path.as_deref(),
            Some("data/.covers/Game_cover.png")
        );

        db.update_thumbnail(id, None).unwrap();
        let game = db.get_game(id).unwrap().unwrap();
        assert!(game.thumbnail_path.is_none());
    }

    #[test]
    fn test_delete_returns_owned_paths() {
        let db = GameDatabase::in_memory().unwrap();
        let id = db
            .add_game("Game", "g.swf", Some("c.png"))
            .unwrap();

        let (asset, thumb) = db.delete_game(id).unwrap();
        assert_eq!(asset, "g.swf");
        assert_eq!(thumb.as_deref(), Some("c.png"));
        assert!(db.get_game(id).unwrap().is_none());

        let err = db.delete_game(id).unwrap_err();
        assert!(matches!(err, LibraryError::GameNotFound(_)));
    }

    #[test]
    fn test_delete_all() {
        let db = GameDatabase::in_memory().unwrap();
        db.add_game("A", "a.swf", None).unwrap();
        db.add_game("B", "b.swf", Some("b.png")).unwrap();

        let removed = db.delete_all().unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(db.game_count().unwrap(), 0);
    }

    #[test]
    fn test_total_plays() {
        let db = GameDatabase::in_memory().unwrap();
        assert_eq!(db.total_plays().unwrap(), 0);

        let a = db.add_game("A", "a.swf", None).unwrap();
        let b = db.add_game("B", "b.swf", None).unwrap();
        db.record_play(a).unwrap();
        db.record_play(a).unwrap();
        db.record_play(b).unwrap();

        assert_eq!(db.total_plays().unwrap(), 3);
    }

    #[test]
    fn test_search_games() {
        let db = GameDatabase::in_memory().unwrap();
        db.add_game("Bubble Trouble", "bt.swf", None).unwrap();
        db.add_game("Bloons", "bl.swf", None).unwrap();

        let results = db.search_games("Bubble").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Bubble Trouble");
    }

    #[test]
    fn test_get_game_by_asset_path() {
        let db = GameDatabase::in_memory().unwrap();
        db.add_game("Game", "data/.games/Game.swf", None).unwrap();

        assert!(
            db.get_game_by_asset_path("data/.games/Game.swf")
                .unwrap()
                .is_some()
        );
        assert!(db.get_game_by_asset_path("elsewhere.swf").unwrap().is_none());
    }
}
