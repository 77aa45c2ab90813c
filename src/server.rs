use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{Res, api, host::HostRegistry, info};

pub fn router(host: Arc<HostRegistry>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/loadtracks", get(api::loadtracks).layer(Extension(host)))
}

pub async fn start_api_server(addr: &str, host: Arc<HostRegistry>) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", addr, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(host)).await?;
    Ok(())
}
