//! The search entry point that expands Spotify links.
//!
//! [`SpotifyPlugin`] owns the long-lived pieces (token manager and its renewal
//! task, catalog fetcher, optional matcher). [`SpotifyPlugin::load`] splices a
//! [`SpotifyProvider`] in front of the host's current search provider; queries
//! that are not Spotify links reach the previous provider unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::{
    assembler,
    backend::{NodeLookup, TrackMatcher},
    config::{MatchFailurePolicy, ResolverOptions},
    error::{ResolverError, Result},
    host::{SearchHost, SearchProvider},
    management::{Credentials, RenewalHandle, TokenManager, TokenSource},
    spotify::{CatalogFetcher, ClientCredentialsSource, ResourceResolver},
    types::{
        CatalogTrack, ParsedQuery, QueueTrack, ResolvedTrack, ResourceReference, SearchResponse,
        UnresolvedTrack,
    },
    warning,
};

struct Pipeline {
    resolver: ResourceResolver,
    fetcher: CatalogFetcher,
    matcher: Option<Arc<TrackMatcher>>,
    convert_unresolved: bool,
    match_failure: MatchFailurePolicy,
    match_concurrency: usize,
}

impl Pipeline {
    async fn load(
        &self,
        reference: &ResourceReference,
        requester: Option<Value>,
    ) -> Result<SearchResponse> {
        let fetched = self.fetcher.fetch(reference).await?;

        let tracks = match (&self.matcher, self.convert_unresolved) {
            (Some(matcher), true) => {
                let tracks = self.resolve_all(matcher, fetched.tracks, requester).await?;
                if tracks.is_empty() {
                    return Ok(assembler::no_matches());
                }
                tracks
            }
            _ => fetched
                .tracks
                .into_iter()
                .map(|track| assembler::unresolved(track, requester.clone()))
                .collect(),
        };

        Ok(assembler::assemble(reference.kind, fetched.name, tracks))
    }

    async fn resolve_all(
        &self,
        matcher: &TrackMatcher,
        tracks: Vec<CatalogTrack>,
        requester: Option<Value>,
    ) -> Result<Vec<QueueTrack>> {
        // At most `match_concurrency` searches are in flight on the backend.
        let semaphore = Arc::new(Semaphore::new(self.match_concurrency));
        let outcomes = join_all(tracks.iter().map(|track| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| ResolverError::Transport(e.to_string()))?;
                matcher.match_track(track).await
            }
        }))
        .await;

        let mut resolved = Vec::with_capacity(tracks.len());
        for (track, outcome) in tracks.iter().zip(outcomes) {
            match outcome {
                Ok(candidate) => resolved.push(assembler::resolved(candidate, requester.clone())),
                Err(e) => match self.match_failure {
                    MatchFailurePolicy::Drop => warning!(
                        "Dropping \"{} - {}\": {}",
                        track.primary_artist,
                        track.title,
                        e
                    ),
                    MatchFailurePolicy::FailBatch => return Err(e),
                },
            }
        }

        Ok(resolved)
    }
}

pub struct SpotifyPlugin {
    pipeline: Arc<Pipeline>,
    tokens: Arc<TokenManager>,
    renewal: Option<RenewalHandle>,
}

impl SpotifyPlugin {
    /// Validates `options` and starts token renewal right away. Fails with a
    /// configuration error when called outside a tokio runtime.
    ///
    /// `nodes` is required when `convert_unresolved` is set.
    pub fn new(options: ResolverOptions, nodes: Option<Arc<dyn NodeLookup>>) -> Result<Self> {
        options.validate()?;
        let client = Client::new();
        let credentials = Credentials::new(&options.client_id, &options.client_secret)?;
        let source = Arc::new(ClientCredentialsSource::new(
            client.clone(),
            options.token_url.clone(),
            credentials,
        ));

        Self::with_token_source(options, source, nodes, client)
    }

    /// Same as [`SpotifyPlugin::new`] with a caller supplied token source.
    pub fn with_token_source(
        options: ResolverOptions,
        source: Arc<dyn TokenSource>,
        nodes: Option<Arc<dyn NodeLookup>>,
        client: Client,
    ) -> Result<Self> {
        options.validate()?;
        if options.convert_unresolved && nodes.is_none() {
            return Err(ResolverError::Config(
                "Spotify option \"convertUnresolved\" needs a search backend node lookup.".into(),
            ));
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(ResolverError::Config(
                "The Spotify plugin must be created inside a tokio runtime.".into(),
            ));
        }

        let tokens = Arc::new(TokenManager::new(source, options.renewal_retries));
        let renewal = tokens.start();

        let fetcher = CatalogFetcher::new(
            client.clone(),
            options.api_url.clone(),
            Arc::clone(&tokens),
            options.playlist_limit,
            options.album_limit,
        );
        let matcher = nodes.map(|nodes| {
            Arc::new(TrackMatcher::new(
                client,
                nodes,
                options.search_prefix.clone(),
            ))
        });

        Ok(SpotifyPlugin {
            pipeline: Arc::new(Pipeline {
                resolver: ResourceResolver::new(),
                fetcher,
                matcher,
                convert_unresolved: options.convert_unresolved,
                match_failure: options.match_failure,
                match_concurrency: options.match_concurrency,
            }),
            tokens,
            renewal: Some(renewal),
        })
    }

    /// Installs the Spotify provider into `host`, keeping the host's current
    /// provider as the pass-through for everything that is not a Spotify link.
    pub fn load(&self, host: &mut dyn SearchHost) -> Arc<SpotifyProvider> {
        let provider = Arc::new(self.provider(host.search_provider()));
        host.set_search_provider(provider.clone());
        provider
    }

    pub fn provider(&self, fallback: Arc<dyn SearchProvider>) -> SpotifyProvider {
        SpotifyProvider {
            pipeline: Arc::clone(&self.pipeline),
            fallback,
        }
    }

    pub fn tokens(&self) -> Arc<TokenManager> {
        Arc::clone(&self.tokens)
    }

    pub fn matcher(&self) -> Option<Arc<TrackMatcher>> {
        self.pipeline.matcher.clone()
    }

    /// Binds an unresolved track to a backend track, for hosts that resolve
    /// lazily at play time.
    pub async fn resolve(&self, track: &UnresolvedTrack) -> Result<ResolvedTrack> {
        let matcher = self.pipeline.matcher.as_ref().ok_or_else(|| {
            ResolverError::Config("No search backend node lookup configured".into())
        })?;

        let catalog = CatalogTrack {
            title: track.title.clone(),
            primary_artist: track.author.clone(),
            duration_ms: track.duration_ms,
        };
        let candidate = matcher.match_track(&catalog).await?;

        Ok(assembler::resolved_track(candidate, track.requester.clone()))
    }

    pub fn is_renewing(&self) -> bool {
        self.renewal.as_ref().is_some_and(|r| r.is_running())
    }

    /// Stops token renewal. The current token stays usable until it expires.
    pub async fn shutdown(&mut self) {
        if let Some(renewal) = self.renewal.take() {
            renewal.shutdown().await;
        }
    }
}

/// [`SearchProvider`] installed by [`SpotifyPlugin::load`].
pub struct SpotifyProvider {
    pipeline: Arc<Pipeline>,
    fallback: Arc<dyn SearchProvider>,
}

#[async_trait]
impl SearchProvider for SpotifyProvider {
    async fn search(&self, query: &str, requester: Option<Value>) -> SearchResponse {
        let reference = match self.pipeline.resolver.parse(query) {
            ParsedQuery::NotOurs => return self.fallback.search(query, requester).await,
            ParsedQuery::UnsupportedKind(_) => return assembler::unsupported_kind(),
            ParsedQuery::Resource(reference) => reference,
        };

        match self.pipeline.load(&reference, requester).await {
            Ok(response) => response,
            Err(e) => assembler::from_error(&e),
        }
    }
}
