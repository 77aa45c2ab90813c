use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub expires_in_ms: u64,
    pub obtained_at: i64,
}

impl Token {
    pub fn empty() -> Self {
        Token {
            value: String::new(),
            expires_in_ms: 0,
            obtained_at: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Raw answer of the token endpoint. Both fields are optional so that a
/// rejected client can be told apart from a transport failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenGrant {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Track,
    Album,
    Playlist,
}

impl ResourceKind {
    pub fn from_capture(kind: &str) -> Option<Self> {
        match kind {
            "track" => Some(ResourceKind::Track),
            "album" => Some(ResourceKind::Album),
            "playlist" => Some(ResourceKind::Playlist),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Track => "track",
            ResourceKind::Album => "album",
            ResourceKind::Playlist => "playlist",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    pub kind: ResourceKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuery {
    Resource(ResourceReference),
    /// The query has the catalog link shape but names a kind we do not load.
    UnsupportedKind(String),
    NotOurs,
}

// Catalog payloads. Track fields stay untyped until validated so that a bad
// item is reported as a catalog error rather than a decoding failure.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrack {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub artists: Option<Value>,
    #[serde(default)]
    pub duration_ms: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub tracks: Page<RawTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<RawTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub tracks: Page<PlaylistItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub title: String,
    pub primary_artist: String,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    pub tracks: Vec<CatalogTrack>,
    pub name: Option<String>,
}

// Search backend payloads.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendLoadType {
    TrackLoaded,
    PlaylistLoaded,
    SearchResult,
    NoMatches,
    LoadFailed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTracksResponse {
    pub load_type: BackendLoadType,
    #[serde(default)]
    pub tracks: Vec<BackendTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendTrack {
    #[serde(alias = "encoded")]
    pub track: String,
    pub info: BackendTrackInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendTrackInfo {
    pub author: String,
    pub title: String,
    pub length: u64,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub external_id: String,
    pub author: String,
    pub title: String,
    pub length_ms: u64,
    pub uri: Option<String>,
}

impl From<BackendTrack> for MatchCandidate {
    fn from(track: BackendTrack) -> Self {
        MatchCandidate {
            external_id: track.track,
            author: track.info.author,
            title: track.info.title,
            length_ms: track.info.length,
            uri: track.info.uri,
        }
    }
}

// Host facing envelope.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedTrack {
    pub title: String,
    pub author: String,
    pub duration_ms: Option<u64>,
    pub requester: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub track: String,
    pub title: String,
    pub author: String,
    pub duration_ms: u64,
    pub uri: Option<String>,
    pub requester: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum QueueTrack {
    Unresolved(UnresolvedTrack),
    Resolved(ResolvedTrack),
}

impl QueueTrack {
    pub fn title(&self) -> &str {
        match self {
            QueueTrack::Unresolved(t) => &t.title,
            QueueTrack::Resolved(t) => &t.title,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            QueueTrack::Unresolved(t) => &t.author,
            QueueTrack::Resolved(t) => &t.author,
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            QueueTrack::Unresolved(t) => t.duration_ms,
            QueueTrack::Resolved(t) => Some(t.duration_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadType {
    TrackLoaded,
    PlaylistLoaded,
    LoadFailed,
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub duration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchException {
    pub message: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub load_type: LoadType,
    pub tracks: Vec<QueueTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<SearchException>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub title: String,
    pub author: String,
    pub duration: String,
    pub state: String,
}
