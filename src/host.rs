//! Capabilities shared with the playback host.
//!
//! A host answers searches through a [`SearchProvider`]. The Spotify plugin
//! registers by taking the host's current provider as its pass-through and
//! installing itself in its place, see [`crate::plugin::SpotifyPlugin::load`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    assembler,
    backend::TrackMatcher,
    types::{BackendLoadType, LoadType, MatchCandidate, SearchResponse},
};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, requester: Option<Value>) -> SearchResponse;
}

/// A host with a replaceable search entry point.
pub trait SearchHost {
    fn search_provider(&self) -> Arc<dyn SearchProvider>;
    fn set_search_provider(&mut self, provider: Arc<dyn SearchProvider>);
}

/// Minimal host: holds the installed provider and forwards searches to it.
pub struct HostRegistry {
    provider: Arc<dyn SearchProvider>,
}

impl HostRegistry {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        HostRegistry { provider }
    }

    pub async fn search(&self, query: &str, requester: Option<Value>) -> SearchResponse {
        self.provider.search(query, requester).await
    }
}

impl SearchHost for HostRegistry {
    fn search_provider(&self) -> Arc<dyn SearchProvider> {
        Arc::clone(&self.provider)
    }

    fn set_search_provider(&mut self, provider: Arc<dyn SearchProvider>) {
        self.provider = provider;
    }
}

/// Answers every query with `NO_MATCHES`.
pub struct NoMatchesSearch;

#[async_trait]
impl SearchProvider for NoMatchesSearch {
    async fn search(&self, _query: &str, _requester: Option<Value>) -> SearchResponse {
        assembler::no_matches()
    }
}

/// Hands the query unchanged to a search backend node.
pub struct BackendSearch {
    matcher: Arc<TrackMatcher>,
}

impl BackendSearch {
    pub fn new(matcher: Arc<TrackMatcher>) -> Self {
        BackendSearch { matcher }
    }
}

#[async_trait]
impl SearchProvider for BackendSearch {
    async fn search(&self, query: &str, requester: Option<Value>) -> SearchResponse {
        let response = match self.matcher.load_tracks(query).await {
            Ok(response) => response,
            Err(e) => return assembler::from_error(&e),
        };

        let load_type = match response.load_type {
            BackendLoadType::TrackLoaded | BackendLoadType::SearchResult => LoadType::TrackLoaded,
            BackendLoadType::PlaylistLoaded => LoadType::PlaylistLoaded,
            BackendLoadType::NoMatches => return assembler::no_matches(),
            BackendLoadType::LoadFailed | BackendLoadType::Unknown => {
                return assembler::failed(format!("Search backend could not load \"{}\"", query));
            }
        };

        let tracks = response
            .tracks
            .into_iter()
            .map(|track| assembler::resolved(MatchCandidate::from(track), requester.clone()))
            .collect();

        SearchResponse {
            load_type,
            tracks,
            playlist: None,
            exception: None,
        }
    }
}
