use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};

use crate::{
    error::{ResolverError, Result},
    management::{Credentials, TokenSource},
    types::TokenGrant,
};

/// Client credentials grant against the Spotify accounts service.
///
/// The response body is decoded whatever the status code: a rejected client
/// answers with an error object that has no `access_token`, which the
/// [`crate::management::TokenManager`] reports as an authentication failure.
pub struct ClientCredentialsSource {
    client: Client,
    token_url: String,
    credentials: Credentials,
}

impl ClientCredentialsSource {
    pub fn new(client: Client, token_url: impl Into<String>, credentials: Credentials) -> Self {
        ClientCredentialsSource {
            client,
            token_url: token_url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsSource {
    async fn fetch_token(&self) -> Result<TokenGrant> {
        let res = self
            .client
            .post(&self.token_url)
            .header(AUTHORIZATION, self.credentials.basic_auth_header())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = res.status();
        res.json::<TokenGrant>().await.map_err(|e| {
            ResolverError::Transport(format!("token endpoint answered {}: {}", status, e))
        })
    }
}
