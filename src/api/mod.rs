//! # API Module
//!
//! HTTP endpoints of the resolver front served by [`crate::server`].
//!
//! ## Endpoints
//!
//! - [`loadtracks`] - `GET /loadtracks?identifier=<query>` runs the query
//!   through the installed search provider and answers with the
//!   [`crate::types::SearchResponse`] envelope as JSON. Spotify links are
//!   expanded, everything else goes to the pass-through provider.
//! - [`health`] - `GET /health` returns status and version for monitoring.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spresolve::api::{health, loadtracks};
//!
//! let app = Router::new()
//!     .route("/loadtracks", get(loadtracks))
//!     .route("/health", get(health));
//! ```

mod health;
mod loadtracks;

pub use health::health;
pub use loadtracks::loadtracks;
