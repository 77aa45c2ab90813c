use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    error::{ResolverError, Result},
    management::TokenManager,
    types::{
        Album, CatalogTrack, FetchResult, Page, Playlist, PlaylistItem, RawTrack, ResourceKind,
        ResourceReference,
    },
};

const BAD_GATEWAY_RETRIES: u32 = 3;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(2);

/// Read-only access to tracks, albums and playlists of the Spotify catalog.
pub struct CatalogFetcher {
    client: Client,
    api_url: String,
    tokens: Arc<TokenManager>,
    playlist_limit: Option<u32>,
    album_limit: Option<u32>,
}

impl CatalogFetcher {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        tokens: Arc<TokenManager>,
        playlist_limit: Option<u32>,
        album_limit: Option<u32>,
    ) -> Self {
        CatalogFetcher {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
            playlist_limit,
            album_limit,
        }
    }

    pub async fn fetch(&self, reference: &ResourceReference) -> Result<FetchResult> {
        match reference.kind {
            ResourceKind::Track => self.fetch_track(&reference.id).await,
            ResourceKind::Album => self.fetch_album(&reference.id).await,
            ResourceKind::Playlist => self.fetch_playlist(&reference.id).await,
        }
    }

    pub async fn fetch_track(&self, id: &str) -> Result<FetchResult> {
        let url = format!("{}/tracks/{}", self.api_url, id);
        let track = self.get::<RawTrack>(&url).await?;

        Ok(FetchResult {
            tracks: vec![convert_track(Some(track))?],
            name: None,
        })
    }

    /// Retrieves an album and its tracks from the Spotify Web API.
    ///
    /// The album object carries the first page of tracks. Further pages are
    /// followed through their `next` cursor until the catalog runs out of
    /// pages or the configured album page limit is reached.
    ///
    /// # Arguments
    ///
    /// * `id` - Spotify album id as captured from the link
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(FetchResult)` - Validated tracks in album order and the album name
    /// - `Err(ResolverError::CatalogValidation)` - An item on any page is malformed;
    ///   tracks collected so far are discarded
    /// - `Err(ResolverError::Transport)` - Network error or non-success status
    ///
    /// # Page Limits
    ///
    /// With an album limit of `n`, at most `n` pages (50 tracks each) are read,
    /// the page embedded in the album object included.
    pub async fn fetch_album(&self, id: &str) -> Result<FetchResult> {
        let url = format!("{}/albums/{}", self.api_url, id);
        let album = self.get::<Album>(&url).await?;

        let tracks = self
            .collect_pages(album.tracks, self.album_limit, |item: RawTrack| {
                convert_track(Some(item))
            })
            .await?;

        Ok(FetchResult {
            tracks,
            name: Some(album.name),
        })
    }

    /// Retrieves a playlist and its tracks from the Spotify Web API.
    ///
    /// Works like [`CatalogFetcher::fetch_album`], with the playlist page limit
    /// (100 tracks per page). Every playlist entry must carry a track object;
    /// an entry without one fails the whole fetch.
    ///
    /// # Arguments
    ///
    /// * `id` - Spotify playlist id as captured from the link
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(FetchResult)` - Validated tracks in playlist order and the playlist name
    /// - `Err(ResolverError)` - Validation or transport failure, see `fetch_album`
    pub async fn fetch_playlist(&self, id: &str) -> Result<FetchResult> {
        let url = format!("{}/playlists/{}", self.api_url, id);
        let playlist = self.get::<Playlist>(&url).await?;

        let tracks = self
            .collect_pages(playlist.tracks, self.playlist_limit, |item: PlaylistItem| {
                convert_track(item.track)
            })
            .await?;

        Ok(FetchResult {
            tracks,
            name: Some(playlist.name),
        })
    }

    /// Converts the first page, then follows `next` cursors one page at a
    /// time until the provider runs out of pages or `limit` pages were read.
    async fn collect_pages<T, F>(
        &self,
        first: Page<T>,
        limit: Option<u32>,
        convert: F,
    ) -> Result<Vec<CatalogTrack>>
    where
        T: DeserializeOwned,
        F: Fn(T) -> Result<CatalogTrack>,
    {
        let mut tracks = first
            .items
            .into_iter()
            .map(&convert)
            .collect::<Result<Vec<_>>>()?;
        let mut next = first.next;
        let mut page: u32 = 1;

        while let Some(cursor) = next {
            if limit.is_some_and(|limit| page >= limit) {
                break;
            }

            let next_page = self.get::<Page<T>>(&cursor).await?;
            for item in next_page.items {
                tracks.push(convert(item)?);
            }
            next = next_page.next;
            page += 1;
        }

        Ok(tracks)
    }

    /// Sends an authenticated GET request and decodes the JSON body.
    ///
    /// The bearer token is read from the [`TokenManager`] for every attempt,
    /// so a page requested after a renewal carries the new token.
    ///
    /// # Retry Logic
    ///
    /// A 502 Bad Gateway answer is retried up to three times with a 2-second
    /// delay between attempts. Any other non-success status, and a 502 after
    /// the last retry, is returned as a transport error.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempts = 0;

        loop {
            // read per request, a renewal may have happened since the last page
            let token = self.tokens.current_token();
            let response = self
                .client
                .get(url)
                .header(AUTHORIZATION, token)
                .send()
                .await?;

            if response.status() == StatusCode::BAD_GATEWAY && attempts < BAD_GATEWAY_RETRIES {
                attempts += 1;
                sleep(BAD_GATEWAY_DELAY).await;
                continue; // retry
            }

            let response = response.error_for_status()?;
            return Ok(response.json::<T>().await?);
        }
    }
}

/// Validates one raw catalog item and turns it into a [`CatalogTrack`].
pub fn convert_track(track: Option<RawTrack>) -> Result<CatalogTrack> {
    let Some(track) = track else {
        return Err(invalid("The Spotify track object was not provided"));
    };

    let artists = match track.artists {
        None | Some(Value::Null) => {
            return Err(invalid("The track artists array was not provided"));
        }
        Some(Value::Array(artists)) => artists,
        Some(other) => {
            return Err(invalid(format!(
                "The track artists must be an array, received type {}",
                type_name(&other)
            )));
        }
    };

    let title = match track.name {
        None | Some(Value::Null) => return Err(invalid("The track name was not provided")),
        Some(Value::String(name)) if name.is_empty() => {
            return Err(invalid("The track name was not provided"));
        }
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(invalid(format!(
                "The track name must be a string, received type {}",
                type_name(&other)
            )));
        }
    };

    let primary_artist = match artists.first().and_then(|artist| artist.get("name")) {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(other) if !other.is_null() && !other.is_string() => {
            return Err(invalid(format!(
                "The track artist name must be a string, received type {}",
                type_name(other)
            )));
        }
        _ => return Err(invalid("The track artists array does not name an artist")),
    };

    let duration_ms = match track.duration_ms {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(ms) => Some(ms),
            None => {
                return Err(invalid(format!(
                    "The track duration must be a positive integer, received {}",
                    n
                )));
            }
        },
        Some(other) => {
            return Err(invalid(format!(
                "The track duration must be a number, received type {}",
                type_name(&other)
            )));
        }
    };

    Ok(CatalogTrack {
        title,
        primary_artist,
        duration_ms,
    })
}

fn invalid(message: impl Into<String>) -> ResolverError {
    ResolverError::CatalogValidation(message.into())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
