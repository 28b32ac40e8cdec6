//! Cover download

use flashvault_assets::{AssetError, AssetStore, COVER_EXTENSIONS};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout for the single cover GET
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Browser-like identity; some image hosts refuse plain clients
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Extensions longer than this are treated as not-an-extension
const MAX_EXT_LEN: usize = 5;

/// Downloads cover images into the managed covers directory
pub struct CoverFetcher {
    client: reqwest::Client,
}

impl Default for CoverFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverFetcher {
    /// Create a fetcher with a bounded, browser-identified client
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Install a cover from a local image file
    pub fn from_local_file(
        &self,
        assets: &AssetStore,
        path: &Path,
        title: &str,
    ) -> Result<PathBuf, AssetError> {
        assets.import_cover(path, title)
    }

    /// Acquire a cover from a URL or `file://` URI
    ///
    /// Any failure (unreachable host, non-2xx, unreadable body, write
    /// error) yields `None`; the caller proceeds with no custom cover.
    /// Cancellation is dropping the future; the client timeout bounds a
    /// stalled request.
    pub async fn from_remote(
        &self,
        assets: &AssetStore,
        url: &str,
        title: &str,
    ) -> Option<PathBuf> {
        if let Some(local) = local_file_path(url) {
            return match self.from_local_file(assets, &local, title) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Local cover {} rejected: {}", local.display(), e);
                    None
                }
            };
        }

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Cover fetch failed for {}: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Cover fetch for {} returned {}", url, response.status());
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Cover body read failed for {}: {}", url, e);
                return None;
            }
        };

        let ext = extension_from_url(url);
        match assets.write_cover(&bytes, title, &ext) {
            Ok(path) => {
                tracing::info!("Cover downloaded to {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Cover write failed: {}", e);
                None
            }
        }
    }
}

/// Interpret `file://` URIs as local paths
fn local_file_path(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("file://")?;
    // file:///C:/... keeps the drive letter; file:///home/... keeps the
    // leading slash
    let rest = match rest.strip_prefix('/') {
        Some(r) if r.chars().nth(1) == Some(':') => r,
        _ => rest,
    };
    Some(PathBuf::from(rest))
}

/// Extension from the URL path; `jpg` when absent, overlong, or unknown
fn extension_from_url(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()
        .unwrap_or("");

    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= MAX_EXT_LEN => {
            let ext = ext.to_lowercase();
            if COVER_EXTENSIONS.contains(&ext.as_str()) {
                ext
            } else {
                "jpg".to_string()
            }
        }
        _ => "jpg".to_string(),
    }
}
