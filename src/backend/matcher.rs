use std::sync::Arc;

use regex::Regex;
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    backend::NodeLookup,
    error::{ResolverError, Result},
    types::{BackendLoadType, CatalogTrack, LoadTracksResponse, MatchCandidate},
};

/// Largest gap between catalog and candidate length still counted as the same
/// recording.
pub const DURATION_TOLERANCE_MS: u64 = 1_500;

/// Finds a playable backend track for a catalog track.
pub struct TrackMatcher {
    client: Client,
    nodes: Arc<dyn NodeLookup>,
    search_prefix: String,
}

impl TrackMatcher {
    pub fn new(client: Client, nodes: Arc<dyn NodeLookup>, search_prefix: impl Into<String>) -> Self {
        TrackMatcher {
            client,
            nodes,
            search_prefix: search_prefix.into(),
        }
    }

    /// Runs `identifier` through `/loadtracks` on the least loaded node.
    pub async fn load_tracks(&self, identifier: &str) -> Result<LoadTracksResponse> {
        let node = self
            .nodes
            .least_loaded()
            .ok_or_else(|| ResolverError::Transport("No search backend node available".into()))?;

        let response = self
            .client
            .get(format!("{}/loadtracks", node.url))
            .query(&[("identifier", identifier)])
            .header(AUTHORIZATION, &node.password)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<LoadTracksResponse>().await?)
    }

    /// Searches the backend for a catalog track and picks the best candidate.
    ///
    /// The search query is `<prefix><artist> - <title>`, sent to the least
    /// loaded node. Candidates are ranked by [`select_candidate`].
    ///
    /// # Arguments
    ///
    /// * `track` - Validated catalog track to look for
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(MatchCandidate)` - The selected backend track
    /// - `Err(ResolverError::NoMatch)` - The backend answered `LOAD_FAILED`,
    ///   `NO_MATCHES` or an empty candidate list
    /// - `Err(ResolverError::Transport)` - No node available, or the request failed
    pub async fn match_track(&self, track: &CatalogTrack) -> Result<MatchCandidate> {
        let query = format!(
            "{}{} - {}",
            self.search_prefix, track.primary_artist, track.title
        );
        let response = self.load_tracks(&query).await?;

        if matches!(
            response.load_type,
            BackendLoadType::LoadFailed | BackendLoadType::NoMatches
        ) {
            return Err(no_match(track));
        }

        let candidates = response
            .tracks
            .into_iter()
            .map(MatchCandidate::from)
            .collect();

        select_candidate(track, candidates).ok_or_else(|| no_match(track))
    }
}

/// Picks the candidate that most likely is the catalog track.
///
/// In order: an uploader named like the artist (or its `- Topic` channel),
/// then a candidate with the same title, then the first candidate within
/// [`DURATION_TOLERANCE_MS`] of the catalog length, then the first candidate.
/// Name comparisons are whole-string and case-insensitive.
pub fn select_candidate(
    track: &CatalogTrack,
    candidates: Vec<MatchCandidate>,
) -> Option<MatchCandidate> {
    if candidates.is_empty() {
        return None;
    }

    let channels: Vec<Regex> = [
        track.primary_artist.clone(),
        format!("{} - Topic", track.primary_artist),
    ]
    .iter()
    .filter_map(|name| literal(name))
    .collect();

    let by_author = candidates
        .iter()
        .position(|c| channels.iter().any(|re| re.is_match(&c.author)));

    let by_title = || {
        let title = literal(&track.title)?;
        candidates.iter().position(|c| title.is_match(&c.title))
    };

    let by_duration = || {
        let duration = track.duration_ms?;
        candidates
            .iter()
            .position(|c| c.length_ms.abs_diff(duration) <= DURATION_TOLERANCE_MS)
    };

    let index = by_author.or_else(by_title).or_else(by_duration).unwrap_or(0);
    candidates.into_iter().nth(index)
}

fn literal(text: &str) -> Option<Regex> {
    Regex::new(&format!("(?i)^{}$", regex::escape(text))).ok()
}

fn no_match(track: &CatalogTrack) -> ResolverError {
    ResolverError::NoMatch(format!(
        "No match found for {} - {}",
        track.primary_artist, track.title
    ))
}
