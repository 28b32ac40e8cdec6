//! Player process launcher

use crate::PlayerError;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Launch result
#[derive(Debug)]
pub struct LaunchResult {
    /// Child process handle
    pub child: Child,

    /// PID of the launched process
    pub pid: u32,
}

/// Launches the configured external player
pub struct PlayerLauncher {
    player_path: PathBuf,
}

impl PlayerLauncher {
    /// Create a launcher for a player executable
    pub fn new(player_path: impl Into<PathBuf>) -> Self {
        Self {
            player_path: player_path.into(),
        }
    }

    /// Configured player path, before resolution
    pub fn player_path(&self) -> &Path {
        &self.player_path
    }

    /// Resolve the player executable
    ///
    /// A path that exists on disk wins; a bare name is looked up on PATH.
    pub fn resolve_player(&self) -> Result<PathBuf, PlayerError> {
        if self.player_path.is_file() {
            return Ok(self.player_path.clone());
        }

        if self.player_path.components().count() == 1 {
            if let Ok(found) = which::which(&self.player_path) {
                return Ok(found);
            }
        }

        Err(PlayerError::PlayerNotFound(self.player_path.clone()))
    }

    /// Launch the player with a media file
    pub fn launch(&self, asset_path: &Path) -> Result<LaunchResult, PlayerError> {
        if !asset_path.exists() {
            return Err(PlayerError::AssetNotFound(asset_path.to_path_buf()));
        }

        let player = self.resolve_player()?;

        let mut cmd = Command::new(&player);
        cmd.arg(asset_path);

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::info!(
            "Launching {} with {}",
            player.display(),
            asset_path.display()
        );

        let child = cmd
            .spawn()
            .map_err(|e| PlayerError::LaunchFailed(format!("Failed to spawn process: {}", e)))?;

        let pid = child.id();

        Ok(LaunchResult { child, pid })
    }
}
