//! Spotify link resolver library
//!
//! This library expands Spotify track, album and playlist links into tracks a
//! playback host can queue, and can match each of them against an audio
//! search backend to get a directly playable source. Queries that are not
//! Spotify links are handed to the host's original search untouched.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the resolver front
//! - `assembler` - Builds the search response envelope
//! - `backend` - Search backend nodes and the track matching heuristic
//! - `cli` - Command-line interface implementations
//! - `config` - Resolver options and environment variables
//! - `error` - Error taxonomy of the resolution pipeline
//! - `host` - Capabilities shared with the playback host
//! - `management` - Credentials and token lifecycle
//! - `plugin` - The search entry point wiring everything together
//! - `server` - Local HTTP server
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spresolve::{config::ResolverOptions, host::{HostRegistry, NoMatchesSearch}, plugin::SpotifyPlugin};
//!
//! #[tokio::main]
//! async fn main() -> spresolve::Res<()> {
//!     let plugin = SpotifyPlugin::new(ResolverOptions::new("id", "secret"), None)?;
//!     let mut host = HostRegistry::new(Arc::new(NoMatchesSearch));
//!     plugin.load(&mut host);
//!     let response = host.search("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC", None).await;
//!     println!("{:?}", response.load_type);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assembler;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod management;
pub mod plugin;
pub mod server;
pub mod spotify;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the binary side (CLI, HTTP server) where any error just ends the
/// command. The resolution pipeline itself returns [`error::Result`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// ```
/// info!("Spotify token renewed, valid until {}", expires_at);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with code 1.
///
/// Only meant for the binary: the library never terminates its host, it
/// reports failures through `Result` or the search response instead.
///
/// ```
/// error!("Cannot start resolver. Err: {}", err);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr for recoverable problems, such as a
/// failed token renewal or a track dropped because it had no match.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
