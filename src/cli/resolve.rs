use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;
use tokio::time::timeout;

use crate::{
    config::ResolverOptions,
    error, info, success,
    types::{LoadType, QueueTrack, SearchResponse, TrackTableRow},
    warning,
};

const TOKEN_WAIT: Duration = Duration::from_secs(15);

/// Command line overrides on top of the environment configuration.
#[derive(Debug, Clone, Default)]
pub struct ResolveOverrides {
    pub convert: bool,
    pub playlist_limit: Option<u32>,
    pub album_limit: Option<u32>,
}

pub async fn resolve(query: String, overrides: ResolveOverrides) {
    let mut options = match ResolverOptions::from_env() {
        Ok(options) => options,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };
    if overrides.convert {
        options.convert_unresolved = true;
    }
    if overrides.playlist_limit.is_some() {
        options.playlist_limit = overrides.playlist_limit;
    }
    if overrides.album_limit.is_some() {
        options.album_limit = overrides.album_limit;
    }

    let (mut plugin, host) = match super::bootstrap(options) {
        Ok(parts) => parts,
        Err(e) => error!("Cannot start resolver. Err: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching Spotify token...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    if timeout(TOKEN_WAIT, plugin.tokens().ready()).await.is_err() {
        pb.finish_and_clear();
        error!("No Spotify token after {}s, check your client credentials.", TOKEN_WAIT.as_secs());
    }

    pb.set_message(format!("Resolving {}...", query));
    let response = host.search(&query, None).await;
    pb.finish_and_clear();

    print_response(&response);
    plugin.shutdown().await;
}

fn print_response(response: &SearchResponse) {
    match response.load_type {
        LoadType::LoadFailed => {
            let message = response
                .exception
                .as_ref()
                .map(|e| e.message.as_str())
                .unwrap_or("unknown error");
            warning!("Load failed: {}", message);
            return;
        }
        LoadType::NoMatches => {
            warning!("No matches.");
            return;
        }
        LoadType::TrackLoaded | LoadType::PlaylistLoaded => {}
    }

    if let Some(playlist) = &response.playlist {
        info!(
            "{} ({} tracks, {})",
            playlist.name,
            response.tracks.len(),
            super::format_duration(Some(playlist.duration))
        );
    }

    let rows: Vec<TrackTableRow> = response
        .tracks
        .iter()
        .map(|t| TrackTableRow {
            title: t.title().to_string(),
            author: t.author().to_string(),
            duration: super::format_duration(t.duration_ms()),
            state: match t {
                QueueTrack::Unresolved(_) => "unresolved".to_string(),
                QueueTrack::Resolved(_) => "resolved".to_string(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));
    success!("Loaded {} track(s).", response.tracks.len());
}
