use std::fmt;

/// Errors raised anywhere in the resolution pipeline.
///
/// Only [`ResolverError::Config`] and [`ResolverError::Auth`] are allowed to
/// escape to a host: the first at construction, the second from the token
/// renewal task. Everything raised while answering a query is folded into a
/// [`crate::types::SearchResponse`] by [`crate::assembler::from_error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// Malformed construction options.
    Config(String),
    /// The token endpoint rejected the credentials or returned no token.
    Auth(String),
    /// A catalog item is missing required fields or has wrong field types.
    CatalogValidation(String),
    /// The search backend produced no usable candidate.
    NoMatch(String),
    /// Any underlying network or decoding failure.
    Transport(String),
}

impl ResolverError {
    pub fn message(&self) -> &str {
        match self {
            ResolverError::Config(msg)
            | ResolverError::Auth(msg)
            | ResolverError::CatalogValidation(msg)
            | ResolverError::NoMatch(msg)
            | ResolverError::Transport(msg) => msg,
        }
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            ResolverError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            ResolverError::CatalogValidation(msg) => write!(f, "invalid catalog item: {}", msg),
            ResolverError::NoMatch(msg) => write!(f, "no match: {}", msg),
            ResolverError::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for ResolverError {}

impl From<reqwest::Error> for ResolverError {
    fn from(err: reqwest::Error) -> Self {
        ResolverError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
