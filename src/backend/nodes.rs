use std::sync::atomic::{AtomicU64, Ordering};

/// A search backend node reachable over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub url: String,
    pub password: String,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Node {
            name: name.into(),
            url: url.into().trim_end_matches('/').to_string(),
            password: password.into(),
        }
    }
}

/// Supplied by the host: which node should take the next search.
pub trait NodeLookup: Send + Sync {
    fn least_loaded(&self) -> Option<Node>;
}

/// Fixed set of nodes whose load figures are pushed in by the host,
/// for example from node statistics events.
pub struct StaticNodes {
    nodes: Vec<(Node, AtomicU64)>,
}

impl StaticNodes {
    pub fn new(nodes: Vec<Node>) -> Self {
        StaticNodes {
            nodes: nodes
                .into_iter()
                .map(|node| (node, AtomicU64::new(0)))
                .collect(),
        }
    }

    /// Returns false when no node has that name.
    pub fn set_load(&self, name: &str, load: u64) -> bool {
        match self.nodes.iter().find(|(node, _)| node.name == name) {
            Some((_, current)) => {
                current.store(load, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }
}

impl NodeLookup for StaticNodes {
    // ties go to the node listed first
    fn least_loaded(&self) -> Option<Node> {
        self.nodes
            .iter()
            .min_by_key(|(_, load)| load.load(Ordering::Relaxed))
            .map(|(node, _)| node.clone())
    }
}
