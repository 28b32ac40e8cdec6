//! FlashVault Launcher
//!
//! Command-line front end for the FlashVault library. Manages a catalog of
//! Flash game files, their cover art, and launches them through a standalone
//! Flash player.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{error, info, warn};

use flashvault_config::{Settings, DATA_DIR};
use flashvault_cover::{CandidateSource, CoverFetcher, CoverPicker};
use flashvault_library::{GameRecord, Library};
use flashvault_player::PlayerLauncher;
use flashvault_thumbnail::{ensure_default_cover, save_png, thumbnail_for};

/// Application state shared by all commands.
struct App {
    library: Library,
    settings: Settings,
    fetcher: CoverFetcher,
}

impl App {
    fn new() -> Result<Self> {
        let settings = Settings::load(&Settings::default_path())?;
        let library = Library::open(DATA_DIR)?;

        // The placeholder cover is rendered once and reused from disk.
        ensure_default_cover(library.assets().default_cover_path())?;

        Ok(Self {
            library,
            settings,
            fetcher: CoverFetcher::new(),
        })
    }

    /// List games, optionally filtered by a title substring.
    fn list(&self, query: Option<&str>) -> Result<()> {
        let games = match query {
            Some(q) => self.library.db().search_games(q)?,
            None => self.library.db().get_all_games()?,
        };

        if games.is_empty() {
            println!("No games in the library.");
            return Ok(());
        }

        println!(
            "{} games, {} plays total",
            self.library.db().game_count()?,
            self.library.db().total_plays()?
        );
        for game in &games {
            print_game(game);
        }
        Ok(())
    }

    fn show(&self, id: i64) -> Result<()> {
        let game = self.library.get_game(id)?;
        println!("Title:      {}", game.title);
        println!("Asset:      {}", game.asset_path);
        match &game.thumbnail_path {
            Some(path) => println!("Cover:      {path}"),
            None => println!("Cover:      (none)"),
        }
        println!("Added:      {}", game.added_at);
        match &game.last_played_at {
            Some(ts) => println!("Last play:  {ts}"),
            None => println!("Last play:  never"),
        }
        println!("Play count: {}", game.play_count);
        Ok(())
    }

    fn add(&self, source: &Path, title: Option<&str>) -> Result<()> {
        let game = self.library.add_game(source, title, None)?;
        println!("Added \"{}\" (id {})", game.title, game.id);
        Ok(())
    }

    fn import(&self, folder: &Path) -> Result<()> {
        let imported = self.library.import_directory(folder)?;
        println!("Imported {} new games from {}", imported, folder.display());
        Ok(())
    }

    fn play(&self, id: i64) -> Result<()> {
        let game = self.library.get_game(id)?;
        let launcher = PlayerLauncher::new(&self.settings.player_path);
        let result = launcher.launch(Path::new(&game.asset_path))?;
        info!("Launched \"{}\" with PID {}", game.title, result.pid);
        self.library.record_play(id)?;

        let mut child = result.child;
        let status = child.wait()?;
        if !status.success() {
            warn!("Player exited with {}", status);
        }
        Ok(())
    }

    fn remove(&self, id: i64) -> Result<()> {
        let title = self.library.get_game(id)?.title;
        self.library.remove_game(id)?;
        println!("Removed \"{title}\"");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let summary = self.library.clear_library()?;
        println!(
            "Removed {} records, {} game files, {} covers",
            summary.records_removed, summary.assets_released, summary.covers_released
        );
        Ok(())
    }

    fn set_cover_file(&self, id: i64, source: &Path) -> Result<()> {
        let managed = self.library.set_cover_from_file(id, source)?;
        println!("Cover saved to {managed}");
        Ok(())
    }

    async fn set_cover_url(&self, id: i64, url: &str) -> Result<()> {
        let game = self.library.get_game(id)?;
        match self
            .fetcher
            .from_remote(self.library.assets(), url, &game.title)
            .await
        {
            Some(path) => {
                self.library.set_cover_path(id, &path)?;
                println!("Cover saved to {}", path.display());
                Ok(())
            }
            None => bail!("could not fetch a cover from {url}"),
        }
    }

    /// Interactive cover search: print the image-search URL, let the user
    /// paste a candidate URL, then download the confirmed one.
    async fn pick_cover(&self, id: i64) -> Result<()> {
        if !self.settings.use_enhanced_cover_picker {
            bail!("the cover picker is disabled in config.toml");
        }
        let game = self.library.get_game(id)?;

        let mut picker = CoverPicker::new(&game.title);
        picker.begin_search()?;
        println!("Search for covers here:\n  {}", picker.search_url());

        let source = StdinCandidateSource;
        match source.pick_candidate(picker.query()) {
            Some(url) => picker.select_candidate(url)?,
            None => {
                picker.cancel();
                println!("Cover selection cancelled.");
                return Ok(());
            }
        }

        let url = picker.confirm()?;
        self.set_cover_url(id, &url).await
    }

    fn clear_cover(&self, id: i64) -> Result<()> {
        self.library.clear_cover(id)?;
        println!("Cover cleared; the default card will be used.");
        Ok(())
    }

    /// Render the library card thumbnail for a game to a PNG file.
    fn render_card(&self, id: i64, output: &Path) -> Result<()> {
        let game = self.library.get_game(id)?;
        let image = thumbnail_for(
            game.thumbnail_path.as_deref().map(Path::new),
            &game.title,
            self.settings.thumbnail_style,
            Some(self.library.assets().default_cover_path()),
        );
        save_png(&image, output)?;
        println!("Wrote {}", output.display());
        Ok(())
    }
}

/// Reads candidate image URLs from standard input. An empty line cancels.
struct StdinCandidateSource;

impl CandidateSource for StdinCandidateSource {
    fn pick_candidate(&self, _query: &str) -> Option<String> {
        print!("Paste an image URL (empty line to cancel): ");
        io::stdout().flush().ok()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

fn print_game(game: &GameRecord) {
    let cover = if game.thumbnail_path.is_some() { "*" } else { " " };
    println!(
        "{:>4} {} {:<30} plays: {}",
        game.id, cover, game.title, game.play_count
    );
}

fn print_usage() {
    println!("FlashVault - Flash game library");
    println!();
    println!("Usage: flashvault <command> [args]");
    println!();
    println!("Commands:");
    println!("  list [query]              List games, optionally filtered by title");
    println!("  show <id>                 Show details for one game");
    println!("  add <file.swf> [title]    Add a game, importing the file");
    println!("  import <folder>           Add every .swf file in a folder");
    println!("  play <id>                 Launch a game in the Flash player");
    println!("  remove <id>               Remove a game and its files");
    println!("  clear                     Remove every game from the library");
    println!("  cover <id> file <path>    Use a local image as the cover");
    println!("  cover <id> url <url>      Download a cover image");
    println!("  cover <id> pick           Search for a cover interactively");
    println!("  cover <id> default        Drop the custom cover");
    println!("  card <id> <out.png>       Render the library card to a PNG");
}

fn parse_id(arg: Option<&String>) -> Result<i64> {
    let arg = arg.context("expected a game id")?;
    arg.parse::<i64>()
        .with_context(|| format!("\"{arg}\" is not a game id"))
}

async fn run(args: &[String]) -> Result<()> {
    let app = App::new()?;

    match args.first().map(String::as_str) {
        Some("list") => app.list(args.get(1).map(String::as_str)),
        Some("show") => app.show(parse_id(args.get(1))?),
        Some("add") => {
            let source = args.get(1).context("expected a .swf file path")?;
            app.add(Path::new(source), args.get(2).map(String::as_str))
        }
        Some("import") => {
            let folder = args.get(1).context("expected a folder path")?;
            app.import(Path::new(folder))
        }
        Some("play") => app.play(parse_id(args.get(1))?),
        Some("remove") => app.remove(parse_id(args.get(1))?),
        Some("clear") => app.clear(),
        Some("cover") => {
            let id = parse_id(args.get(1))?;
            match args.get(2).map(String::as_str) {
                Some("file") => {
                    let path = args.get(3).context("expected an image path")?;
                    app.set_cover_file(id, Path::new(path))
                }
                Some("url") => {
                    let url = args.get(3).context("expected an image URL")?;
                    app.set_cover_url(id, url).await
                }
                Some("pick") => app.pick_cover(id).await,
                Some("default") => app.clear_cover(id),
                _ => bail!("expected one of: file, url, pick, default"),
            }
        }
        Some("card") => {
            let id = parse_id(args.get(1))?;
            let output = args.get(2).context("expected an output path")?;
            app.render_card(id, Path::new(output))
        }
        Some(other) => bail!("unknown command \"{other}\""),
        None => {
            print_usage();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}
