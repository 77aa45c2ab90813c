mod resolve;
mod serve;

use std::sync::Arc;

pub use resolve::{ResolveOverrides, resolve};
pub use serve::serve;

use crate::{
    backend::{Node, NodeLookup, StaticNodes},
    config::{self, ResolverOptions},
    error::Result,
    host::{BackendSearch, HostRegistry, NoMatchesSearch, SearchProvider},
    plugin::SpotifyPlugin,
};

/// Builds the plugin from `options` and installs it into a fresh host.
///
/// The host's own search goes to the backend node from `BACKEND_NODE_URL`
/// when one is configured, otherwise every non Spotify query gets
/// `NO_MATCHES`.
pub fn bootstrap(options: ResolverOptions) -> Result<(SpotifyPlugin, HostRegistry)> {
    let nodes = config::backend_node().map(|(url, password)| {
        Arc::new(StaticNodes::new(vec![Node::new("default", url, password)]))
            as Arc<dyn NodeLookup>
    });

    let plugin = SpotifyPlugin::new(options, nodes)?;
    let fallback: Arc<dyn SearchProvider> = match plugin.matcher() {
        Some(matcher) => Arc::new(BackendSearch::new(matcher)),
        None => Arc::new(NoMatchesSearch),
    };

    let mut host = HostRegistry::new(fallback);
    plugin.load(&mut host);
    Ok((plugin, host))
}

fn format_duration(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => {
            let secs = ms / 1000;
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        None => "-".to_string(),
    }
}
