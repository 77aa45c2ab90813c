mod common;

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::get,
};
use reqwest::Client;
use serde_json::json;
use spresolve::{
    backend::{Node, NodeLookup, StaticNodes, TrackMatcher, select_candidate},
    error::ResolverError,
    types::{CatalogTrack, MatchCandidate},
};

use common::{backend_track, spawn_server};

// Helper function to create a catalog track
fn catalog(artist: &str, title: &str, duration_ms: Option<u64>) -> CatalogTrack {
    CatalogTrack {
        title: title.to_string(),
        primary_artist: artist.to_string(),
        duration_ms,
    }
}

// Helper function to create a backend candidate
fn candidate(author: &str, title: &str, length_ms: u64) -> MatchCandidate {
    MatchCandidate {
        external_id: format!("{}/{}", author, title),
        author: author.to_string(),
        title: title.to_string(),
        length_ms,
        uri: None,
    }
}

#[test]
fn test_author_match_wins_over_title_match() {
    let track = catalog("A", "T", None);
    let candidates = vec![candidate("X", "T", 0), candidate("A", "Y", 0)];

    let selected = select_candidate(&track, candidates).unwrap();
    assert_eq!(selected.author, "A");
    assert_eq!(selected.title, "Y");
}

#[test]
fn test_topic_channel_counts_as_author() {
    let track = catalog("Daft Punk", "One More Time", Some(320_000));
    let candidates = vec![
        candidate("Random Uploader", "one more time (live)", 320_000),
        candidate("daft punk - topic", "One More Time", 320_357),
    ];

    let selected = select_candidate(&track, candidates).unwrap();
    assert_eq!(selected.author, "daft punk - topic");
}

#[test]
fn test_title_match_is_case_insensitive_and_whole_string() {
    let track = catalog("Artist", "Song", None);
    let candidates = vec![
        candidate("X", "Song (Remix)", 0),
        candidate("Y", "SONG", 0),
    ];

    let selected = select_candidate(&track, candidates).unwrap();
    assert_eq!(selected.author, "Y");
}

#[test]
fn test_metacharacters_are_matched_literally() {
    let track = catalog("A.B", "What?", None);

    // "A.B" must not match "AxB" as a pattern would
    let candidates = vec![candidate("AxB", "Whatt", 0), candidate("Z", "what?", 0)];
    let selected = select_candidate(&track, candidates).unwrap();
    assert_eq!(selected.author, "Z");

    let candidates = vec![candidate("Other", "Else", 0), candidate("a.b", "Else", 0)];
    let selected = select_candidate(&track, candidates).unwrap();
    assert_eq!(selected.author, "a.b");
}

#[test]
fn test_duration_window_match() {
    let track = catalog("A", "T", Some(200_000));
    let candidates = vec![candidate("X", "Y", 250_000), candidate("Z", "W", 201_000)];

    let selected = select_candidate(&track, candidates).unwrap();
    assert_eq!(selected.length_ms, 201_000);
}

#[test]
fn test_duration_window_bounds() {
    let track = catalog("A", "T", Some(200_000));

    let candidates = vec![candidate("X", "Y", 198_400), candidate("Z", "W", 201_500)];
    assert_eq!(select_candidate(&track, candidates).unwrap().length_ms, 201_500);

    let candidates = vec![candidate("X", "Y", 198_499), candidate("Z", "W", 198_500)];
    assert_eq!(select_candidate(&track, candidates).unwrap().length_ms, 198_500);
}

#[test]
fn test_falls_back_to_first_candidate() {
    let track = catalog("A", "T", Some(200_000));
    let candidates = vec![candidate("X", "Y", 10_000), candidate("Z", "W", 900_000)];

    assert_eq!(select_candidate(&track, candidates).unwrap().author, "X");

    // unknown catalog duration skips the window rule
    let track = catalog("A", "T", None);
    let candidates = vec![candidate("X", "Y", 0), candidate("Z", "W", 0)];
    assert_eq!(select_candidate(&track, candidates).unwrap().author, "X");
}

#[test]
fn test_no_candidates() {
    let track = catalog("A", "T", Some(1));
    assert_eq!(select_candidate(&track, Vec::new()), None);
}

#[test]
fn test_static_nodes_pick_least_loaded() {
    let nodes = StaticNodes::new(vec![
        Node::new("one", "http://one:2333/", "pw"),
        Node::new("two", "http://two:2333", "pw"),
    ]);

    // ties go to the first node
    assert_eq!(nodes.least_loaded().unwrap().name, "one");
    assert_eq!(nodes.least_loaded().unwrap().url, "http://one:2333");

    assert!(nodes.set_load("one", 10));
    assert!(nodes.set_load("two", 3));
    assert_eq!(nodes.least_loaded().unwrap().name, "two");

    assert!(!nodes.set_load("three", 0));
    assert!(StaticNodes::new(Vec::new()).least_loaded().is_none());
}

// A search backend node answering /loadtracks for one known query.
async fn node() -> String {
    spawn_server(|_| {
        Router::new().route(
            "/loadtracks",
            get(
                |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                    let authorized = headers
                        .get(AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        == Some("youshallnotpass");
                    if !authorized {
                        return StatusCode::UNAUTHORIZED.into_response();
                    }

                    let identifier = params.get("identifier").cloned().unwrap_or_default();
                    let body = match identifier.as_str() {
                        "ytsearch:Artist - Song" => json!({
                            "loadType": "SEARCH_RESULT",
                            "tracks": [
                                backend_track("Someone", "Song (cover)", 180_000),
                                backend_track("Artist - Topic", "Song", 200_300),
                            ],
                        }),
                        "ytsearch:Artist - Empty" => json!({
                            "loadType": "SEARCH_RESULT",
                            "tracks": [],
                        }),
                        _ => json!({
                            "loadType": "LOAD_FAILED",
                            "tracks": [],
                            "exception": { "message": "boom", "severity": "FAULT" },
                        }),
                    };
                    Json(body).into_response()
                },
            ),
        )
    })
    .await
}

fn matcher(url: &str, password: &str) -> TrackMatcher {
    let nodes: Arc<dyn NodeLookup> =
        Arc::new(StaticNodes::new(vec![Node::new("main", url, password)]));
    TrackMatcher::new(Client::new(), nodes, "ytsearch:")
}

#[tokio::test]
async fn test_match_track_against_node() {
    let url = node().await;
    let matcher = matcher(&url, "youshallnotpass");

    let selected = matcher
        .match_track(&catalog("Artist", "Song", Some(200_000)))
        .await
        .unwrap();

    assert_eq!(selected.author, "Artist - Topic");
    assert_eq!(selected.external_id, "encoded:Artist - Topic:Song");
    assert_eq!(selected.length_ms, 200_300);
}

#[tokio::test]
async fn test_backend_failure_is_no_match() {
    let url = node().await;
    let matcher = matcher(&url, "youshallnotpass");

    let err = matcher
        .match_track(&catalog("Nobody", "Nothing", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::NoMatch(_)));

    let err = matcher
        .match_track(&catalog("Artist", "Empty", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::NoMatch(_)));
}

#[tokio::test]
async fn test_wrong_node_password_is_transport_error() {
    let url = node().await;
    let matcher = matcher(&url, "wrong");

    let err = matcher
        .match_track(&catalog("Artist", "Song", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::Transport(_)));
}

#[tokio::test]
async fn test_no_node_available() {
    let matcher = TrackMatcher::new(Client::new(), Arc::new(StaticNodes::new(Vec::new())), "ytsearch:");

    let err = matcher
        .match_track(&catalog("Artist", "Song", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::Transport(_)));
}
