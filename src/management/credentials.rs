use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{ResolverError, Result};

/// Client credentials of the catalog provider. The basic-auth header is
/// derived once and never changes afterwards. Whitespace counts as content,
/// the same rule [`crate::config::ResolverOptions::validate`] applies.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    basic_auth_header: String,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ResolverError::Config(
                "client id and client secret must be non-empty".into(),
            ));
        }

        let encoded = STANDARD.encode(format!("{}:{}", client_id, client_secret));
        Ok(Credentials {
            client_id: client_id.to_string(),
            basic_auth_header: format!("Basic {}", encoded),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `Basic base64(client_id:client_secret)`
    pub fn basic_auth_header(&self) -> &str {
        &self.basic_auth_header
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
