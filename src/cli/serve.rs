use std::sync::Arc;

use crate::{config, config::ResolverOptions, error, server};

pub async fn serve() {
    let options = match ResolverOptions::from_env() {
        Ok(options) => options,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let (mut plugin, host) = match super::bootstrap(options) {
        Ok(parts) => parts,
        Err(e) => error!("Cannot start resolver. Err: {}", e),
    };

    if let Err(e) = server::start_api_server(&config::server_addr(), Arc::new(host)).await {
        plugin.shutdown().await;
        error!("Server stopped. Err: {}", e);
    }
}
