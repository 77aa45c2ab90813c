//! Builds the [`SearchResponse`] envelope handed back to the host.

use serde_json::Value;

use crate::{
    error::ResolverError,
    types::{
        CatalogTrack, LoadType, MatchCandidate, PlaylistSummary, QueueTrack, ResolvedTrack,
        ResourceKind, SearchException, SearchResponse, UnresolvedTrack,
    },
};

pub const SEVERITY: &str = "COMMON";
pub const UNSUPPORTED_KIND_MESSAGE: &str =
    "Incorrect type for Spotify URL, must be one of \"track\", \"album\" or \"playlist\".";

pub fn unresolved(track: CatalogTrack, requester: Option<Value>) -> QueueTrack {
    QueueTrack::Unresolved(UnresolvedTrack {
        title: track.title,
        author: track.primary_artist,
        duration_ms: track.duration_ms,
        requester,
    })
}

pub fn resolved(candidate: MatchCandidate, requester: Option<Value>) -> QueueTrack {
    QueueTrack::Resolved(resolved_track(candidate, requester))
}

pub fn resolved_track(candidate: MatchCandidate, requester: Option<Value>) -> ResolvedTrack {
    ResolvedTrack {
        track: candidate.external_id,
        title: candidate.title,
        author: candidate.author,
        duration_ms: candidate.length_ms,
        uri: candidate.uri,
        requester,
    }
}

/// Successful answer for a loaded resource. The playlist summary is only
/// attached when a name is given; its duration counts unknown lengths as 0.
pub fn assemble(kind: ResourceKind, name: Option<String>, tracks: Vec<QueueTrack>) -> SearchResponse {
    let load_type = match kind {
        ResourceKind::Track => LoadType::TrackLoaded,
        ResourceKind::Album | ResourceKind::Playlist => LoadType::PlaylistLoaded,
    };

    let playlist = match kind {
        ResourceKind::Track => None,
        ResourceKind::Album | ResourceKind::Playlist => name.map(|name| PlaylistSummary {
            name,
            duration: tracks.iter().map(|t| t.duration_ms().unwrap_or(0)).sum(),
        }),
    };

    SearchResponse {
        load_type,
        tracks,
        playlist,
        exception: None,
    }
}

pub fn failed(message: impl Into<String>) -> SearchResponse {
    SearchResponse {
        load_type: LoadType::LoadFailed,
        tracks: Vec::new(),
        playlist: None,
        exception: Some(SearchException {
            message: message.into(),
            severity: SEVERITY.to_string(),
        }),
    }
}

pub fn no_matches() -> SearchResponse {
    SearchResponse {
        load_type: LoadType::NoMatches,
        tracks: Vec::new(),
        playlist: None,
        exception: None,
    }
}

pub fn unsupported_kind() -> SearchResponse {
    failed(UNSUPPORTED_KIND_MESSAGE)
}

pub fn from_error(err: &ResolverError) -> SearchResponse {
    match err {
        ResolverError::NoMatch(_) => no_matches(),
        other => failed(other.message()),
    }
}
