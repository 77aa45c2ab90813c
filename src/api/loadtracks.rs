use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    response::Json,
};
use serde::Deserialize;

use crate::{host::HostRegistry, types::SearchResponse};

#[derive(Debug, Deserialize)]
pub struct LoadTracksParams {
    pub identifier: String,
}

pub async fn loadtracks(
    Query(params): Query<LoadTracksParams>,
    Extension(host): Extension<Arc<HostRegistry>>,
) -> Json<SearchResponse> {
    Json(host.search(&params.identifier, None).await)
}
