//! Configuration management for the Spotify resolver.
//!
//! Options are gathered into a single [`ResolverOptions`] structure that is
//! validated once, when a [`crate::plugin::SpotifyPlugin`] is constructed.
//! Hosts embedding the library usually build the structure themselves; the
//! command-line binary fills it from environment variables instead:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr};

use crate::error::{ResolverError, Result};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SEARCH_PREFIX: &str = "ytsearch:";
pub const DEFAULT_MATCH_CONCURRENCY: usize = 16;

/// What happens to a query when one of its tracks cannot be matched while
/// `convert_unresolved` is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchFailurePolicy {
    /// Drop the failed track and keep the rest of the batch.
    #[default]
    Drop,
    /// Answer the whole query with the first failure.
    FailBatch,
}

impl FromStr for MatchFailurePolicy {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(MatchFailurePolicy::Drop),
            "fail" | "fail_batch" | "fail-batch" => Ok(MatchFailurePolicy::FailBatch),
            other => Err(ResolverError::Config(format!(
                "MATCH_FAILURE_POLICY must be \"drop\" or \"fail\", received \"{}\"",
                other
            ))),
        }
    }
}

/// Every option the resolver recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub client_id: String,
    pub client_secret: String,
    /// Amount of playlist pages to load, each page holding up to 100 tracks.
    pub playlist_limit: Option<u32>,
    /// Amount of album pages to load, each page holding up to 50 tracks.
    pub album_limit: Option<u32>,
    /// Match every track against the search backend while answering the query.
    /// Slow for large playlists and heavy on the backend.
    pub convert_unresolved: bool,
    pub match_failure: MatchFailurePolicy,
    /// Upper bound of backend searches running at once while converting.
    pub match_concurrency: usize,
    /// Extra attempts after a failed token renewal before the renewal task stops.
    pub renewal_retries: u32,
    pub api_url: String,
    pub token_url: String,
    pub search_prefix: String,
}

impl ResolverOptions {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        ResolverOptions {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            playlist_limit: None,
            album_limit: None,
            convert_unresolved: false,
            match_failure: MatchFailurePolicy::Drop,
            match_concurrency: DEFAULT_MATCH_CONCURRENCY,
            renewal_retries: 0,
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            search_prefix: DEFAULT_SEARCH_PREFIX.to_string(),
        }
    }

    /// Checks every option and fails fast on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(ResolverError::Config(
                "Spotify option \"clientID\" must be present and be a non-empty string.".into(),
            ));
        }
        if self.client_secret.is_empty() {
            return Err(ResolverError::Config(
                "Spotify option \"clientSecret\" must be a non-empty string.".into(),
            ));
        }
        if self.playlist_limit == Some(0) {
            return Err(ResolverError::Config(
                "Spotify option \"playlistLimit\" must be at least 1.".into(),
            ));
        }
        if self.album_limit == Some(0) {
            return Err(ResolverError::Config(
                "Spotify option \"albumLimit\" must be at least 1.".into(),
            ));
        }
        if self.match_concurrency == 0 {
            return Err(ResolverError::Config(
                "Spotify option \"matchConcurrency\" must be at least 1.".into(),
            ));
        }
        if self.api_url.trim().is_empty() || self.token_url.trim().is_empty() {
            return Err(ResolverError::Config(
                "Spotify API and token URLs must not be empty.".into(),
            ));
        }
        Ok(())
    }

    /// Builds the options from environment variables.
    ///
    /// Required: `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`. Optional:
    /// `SPOTIFY_PLAYLIST_LIMIT`, `SPOTIFY_ALBUM_LIMIT`,
    /// `SPOTIFY_CONVERT_UNRESOLVED`, `SPOTIFY_MATCH_CONCURRENCY`, `MATCH_FAILURE_POLICY`,
    /// `TOKEN_RENEWAL_RETRIES`, `SPOTIFY_API_URL`, `SPOTIFY_API_TOKEN_URL`,
    /// `BACKEND_SEARCH_PREFIX`.
    pub fn from_env() -> Result<Self> {
        let mut options = ResolverOptions::new(
            env::var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
        );

        options.playlist_limit = parse_var("SPOTIFY_PLAYLIST_LIMIT")?;
        options.album_limit = parse_var("SPOTIFY_ALBUM_LIMIT")?;
        options.convert_unresolved = parse_var("SPOTIFY_CONVERT_UNRESOLVED")?.unwrap_or(false);
        options.match_concurrency =
            parse_var("SPOTIFY_MATCH_CONCURRENCY")?.unwrap_or(DEFAULT_MATCH_CONCURRENCY);
        options.renewal_retries = parse_var("TOKEN_RENEWAL_RETRIES")?.unwrap_or(0);
        if let Ok(policy) = env::var("MATCH_FAILURE_POLICY") {
            options.match_failure = policy.parse()?;
        }
        if let Ok(url) = env::var("SPOTIFY_API_URL") {
            options.api_url = url;
        }
        if let Ok(url) = env::var("SPOTIFY_API_TOKEN_URL") {
            options.token_url = url;
        }
        if let Ok(prefix) = env::var("BACKEND_SEARCH_PREFIX") {
            options.search_prefix = prefix;
        }

        options.validate()?;
        Ok(options)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            ResolverError::Config(format!("{} has an invalid value: \"{}\"", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `spresolve/.env` in the platform data directory
/// (`~/.local/share` on Linux). A missing file is not an error; variables
/// already set in the process environment win over the file.
pub async fn load_env() -> std::result::Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spresolve/.env");
    path
}

/// Address the HTTP front binds to, `SERVER_ADDRESS` or `127.0.0.1:2334`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:2334".to_string())
}

/// Search backend node as `(url, password)`, when `BACKEND_NODE_URL` is set.
pub fn backend_node() -> Option<(String, String)> {
    let url = env::var("BACKEND_NODE_URL").ok()?;
    if url.trim().is_empty() {
        return None;
    }
    let password = env::var("BACKEND_NODE_PASSWORD").unwrap_or_default();
    Some((url, password))
}
