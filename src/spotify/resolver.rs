use regex::Regex;

use crate::types::{ParsedQuery, ResourceKind, ResourceReference};

const LINK_PATTERN: &str = r"(?:https://open\.spotify\.com/|spotify:)(.+)(?:[/:])([A-Za-z0-9]+)";

/// Recognises Spotify web links and URIs.
///
/// ```text
/// https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC
/// spotify:album:1DFixLWuPkv3KT3TnV35m3
/// ```
///
/// Kind and id are exact substrings of the query.
pub struct ResourceResolver {
    link_regex: Regex,
}

impl ResourceResolver {
    pub fn new() -> Self {
        ResourceResolver {
            link_regex: Regex::new(LINK_PATTERN).expect("link pattern is a valid regex"),
        }
    }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        let Some(caps) = self.link_regex.captures(query) else {
            return ParsedQuery::NotOurs;
        };

        let kind = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let id = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        match ResourceKind::from_capture(kind) {
            Some(kind) => ParsedQuery::Resource(ResourceReference {
                kind,
                id: id.to_string(),
            }),
            None => ParsedQuery::UnsupportedKind(kind.to_string()),
        }
    }
}

impl Default for ResourceResolver {
    fn default() -> Self {
        Self::new()
    }
}
