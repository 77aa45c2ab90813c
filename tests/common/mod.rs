#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::Router;
use serde_json::{Value, json};
use spresolve::{
    error::Result,
    host::SearchProvider,
    management::TokenSource,
    types::{SearchResponse, TokenGrant},
};

// Helper to serve a router on an ephemeral port. The closure receives the
// base url so that handlers can build absolute `next` cursors.
pub async fn spawn_server<F>(build: F) -> String
where
    F: FnOnce(String) -> Router,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let router = build(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    base
}

// Hands out token-1, token-2, ... and counts how often it was asked.
pub struct CountingSource {
    calls: AtomicUsize,
    expires_in: u64,
}

impl CountingSource {
    pub fn new(expires_in: u64) -> Self {
        CountingSource {
            calls: AtomicUsize::new(0),
            expires_in,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for CountingSource {
    async fn fetch_token(&self) -> Result<TokenGrant> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenGrant {
            access_token: Some(format!("token-{}", n)),
            expires_in: Some(self.expires_in),
        })
    }
}

// Replays a fixed list of grants, then keeps answering without a token.
pub struct ScriptedSource {
    grants: Mutex<VecDeque<TokenGrant>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(grants: Vec<TokenGrant>) -> Self {
        ScriptedSource {
            grants: Mutex::new(grants.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for ScriptedSource {
    async fn fetch_token(&self) -> Result<TokenGrant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.grants.lock().unwrap().pop_front().unwrap_or_default())
    }
}

pub fn grant(token: &str, expires_in: u64) -> TokenGrant {
    TokenGrant {
        access_token: Some(token.to_string()),
        expires_in: Some(expires_in),
    }
}

// Stands in for the host's previous search; remembers what it was asked.
pub struct RecordingSearch {
    pub queries: Mutex<Vec<String>>,
    pub answer: SearchResponse,
}

impl RecordingSearch {
    pub fn new(answer: SearchResponse) -> Self {
        RecordingSearch {
            queries: Mutex::new(Vec::new()),
            answer,
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for RecordingSearch {
    async fn search(&self, query: &str, _requester: Option<Value>) -> SearchResponse {
        self.queries.lock().unwrap().push(query.to_string());
        self.answer.clone()
    }
}

pub fn track_json(name: &str, artist: &str, duration_ms: u64) -> Value {
    json!({
        "name": name,
        "artists": [{ "name": artist }],
        "duration_ms": duration_ms,
    })
}

pub fn backend_track(author: &str, title: &str, length: u64) -> Value {
    json!({
        "track": format!("encoded:{}:{}", author, title),
        "info": {
            "identifier": format!("{}-{}", author, title),
            "author": author,
            "title": title,
            "length": length,
            "uri": format!("https://www.youtube.com/watch?v={}", title),
        }
    })
}

// A small stand-in for the Spotify Web API.
//
// - /tracks/good, /tracks/noartists
// - /albums/three: 3 pages of 2 tracks, /albums/broken: bad item on page 2
// - /playlists/mix: 2 pages (2 + 1 items), /playlists/holes: null track
// - /playlists/big: one page of 40 numbered tracks
//
// Every Authorization header received is pushed to `seen`.
#[derive(Clone)]
pub struct MockCatalog {
    pub base: String,
    pub seen: Arc<Mutex<Vec<String>>>,
}

pub fn catalog_router(base: String, seen: Arc<Mutex<Vec<String>>>) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/tracks/{id}", get(mock::track))
        .route("/albums/{id}", get(mock::album))
        .route("/albums/{id}/tracks", get(mock::album_page))
        .route("/playlists/{id}", get(mock::playlist))
        .route("/playlists/{id}/tracks", get(mock::playlist_page))
        .with_state(MockCatalog { base, seen })
}

pub fn numbered(n: u64) -> Value {
    track_json(&format!("Song {}", n), &format!("Artist {}", n), n * 1000)
}

mod mock {
    use std::collections::HashMap;

    use axum::{
        Json,
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode, header::AUTHORIZATION},
        response::{IntoResponse, Response},
    };
    use serde_json::{Value, json};

    use super::{MockCatalog, numbered, track_json};

    fn record(state: &MockCatalog, headers: &HeaderMap) {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        state.seen.lock().unwrap().push(value);
    }

    fn not_found() -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
        )
            .into_response()
    }

    fn page_of(items: Vec<Value>, next: Option<String>) -> Value {
        json!({ "items": items, "next": next })
    }

    pub async fn track(
        Path(id): Path<String>,
        State(state): State<MockCatalog>,
        headers: HeaderMap,
    ) -> Response {
        record(&state, &headers);
        match id.as_str() {
            "good" => Json(track_json("Song", "Artist", 200_000)).into_response(),
            "noartists" => Json(json!({ "name": "Song", "duration_ms": 1000 })).into_response(),
            _ => not_found(),
        }
    }

    pub async fn album(
        Path(id): Path<String>,
        State(state): State<MockCatalog>,
        headers: HeaderMap,
    ) -> Response {
        record(&state, &headers);
        let next = Some(format!("{}/albums/{}/tracks?page=2", state.base, id));
        match id.as_str() {
            "three" => Json(json!({
                "name": "Three Pages",
                "tracks": page_of(vec![numbered(1), numbered(2)], next),
            }))
            .into_response(),
            "broken" => Json(json!({
                "name": "Broken",
                "tracks": page_of(vec![numbered(1)], next),
            }))
            .into_response(),
            _ => not_found(),
        }
    }

    pub async fn album_page(
        Path(id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        State(state): State<MockCatalog>,
        headers: HeaderMap,
    ) -> Response {
        record(&state, &headers);
        let page = params.get("page").map(String::as_str).unwrap_or("1");
        match (id.as_str(), page) {
            ("three", "2") => Json(page_of(
                vec![numbered(3), numbered(4)],
                Some(format!("{}/albums/three/tracks?page=3", state.base)),
            ))
            .into_response(),
            ("three", "3") => Json(page_of(vec![numbered(5), numbered(6)], None)).into_response(),
            ("broken", "2") => {
                Json(page_of(vec![numbered(2), json!({ "name": "No Artists" })], None))
                    .into_response()
            }
            _ => not_found(),
        }
    }

    pub async fn playlist(
        Path(id): Path<String>,
        State(state): State<MockCatalog>,
        headers: HeaderMap,
    ) -> Response {
        record(&state, &headers);
        match id.as_str() {
            "mix" => Json(json!({
                "name": "Mix",
                "tracks": page_of(
                    vec![json!({ "track": numbered(1) }), json!({ "track": numbered(2) })],
                    Some(format!("{}/playlists/mix/tracks?page=2", state.base)),
                ),
            }))
            .into_response(),
            "big" => Json(json!({
                "name": "Big",
                "tracks": page_of(
                    (1..=40).map(|n| json!({ "track": numbered(n) })).collect(),
                    None,
                ),
            }))
            .into_response(),
            "holes" => Json(json!({
                "name": "Holes",
                "tracks": page_of(vec![json!({ "track": numbered(1) }), json!({ "track": null })], None),
            }))
            .into_response(),
            _ => not_found(),
        }
    }

    pub async fn playlist_page(
        Path(id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        State(state): State<MockCatalog>,
        headers: HeaderMap,
    ) -> Response {
        record(&state, &headers);
        let page = params.get("page").map(String::as_str).unwrap_or("1");
        match (id.as_str(), page) {
            ("mix", "2") => Json(page_of(vec![json!({ "track": numbered(3) })], None)).into_response(),
            _ => not_found(),
        }
    }
}
