//! # Spotify Integration Module
//!
//! Read-only access to the Spotify Web API, limited to what resolving a
//! catalog link needs.
//!
//! ## Architecture
//!
//! ```text
//! Search entry point (plugin)
//!          ↓
//! Spotify Integration Layer
//!     ├── Link parsing (track / album / playlist)
//!     ├── Authentication (client credentials grant)
//!     └── Catalog retrieval (tracks, paged albums and playlists)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`resolver`] - Recognises `https://open.spotify.com/<kind>/<id>` links and
//!   `spotify:<kind>:<id>` URIs.
//! - [`auth`] - Exchanges the client id and secret for an application token.
//!   The token itself is owned by [`crate::management::TokenManager`].
//! - [`catalog`] - Fetches tracks, albums and playlists. Albums and playlists
//!   are paged; the `next` cursor of each page is followed sequentially until
//!   the provider reports the last page or the configured page limit is hit.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Client credentials grant
//! - `GET /tracks/{id}` - Single track
//! - `GET /albums/{id}` - Album with the first page of its tracks
//! - `GET /playlists/{id}` - Playlist with the first page of its items
//!
//! ## Error Types
//!
//! Everything returns [`crate::error::Result`]. Network and status failures
//! become `Transport` errors, malformed catalog items `CatalogValidation`
//! errors. A single malformed item aborts the whole fetch.

pub mod auth;
pub mod catalog;
pub mod resolver;

pub use auth::ClientCredentialsSource;
pub use catalog::CatalogFetcher;
pub use resolver::ResourceResolver;
