use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::sleep,
};

use crate::{
    error::{ResolverError, Result},
    info,
    types::{Token, TokenGrant},
    warning,
};

/// Pause between two renewal attempts after a failure.
pub const RENEWAL_RETRY_DELAY: Duration = Duration::from_secs(5);

// A zero lifetime would make the renewal loop spin.
const MIN_LIFETIME_MS: u64 = 1_000;

/// Something that can exchange credentials for a token grant.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<TokenGrant>;
}

/// Owns the bearer token shared by every request.
///
/// The token sits in a watch channel: the renewal task replaces it as a
/// whole and readers clone whatever complete value is current, so no request
/// ever sees a half-written token. Requests must call [`current_token`] for
/// every HTTP call instead of holding on to a copy.
///
/// [`current_token`]: TokenManager::current_token
pub struct TokenManager {
    source: Arc<dyn TokenSource>,
    token: watch::Sender<Token>,
    retries: u32,
}

impl TokenManager {
    pub fn new(source: Arc<dyn TokenSource>, retries: u32) -> Self {
        let (token, _) = watch::channel(Token::empty());
        TokenManager {
            source,
            token,
            retries,
        }
    }

    /// Value for the `Authorization` header, empty before the first renewal.
    pub fn current_token(&self) -> String {
        self.token.borrow().value.clone()
    }

    pub fn token(&self) -> Token {
        self.token.borrow().clone()
    }

    /// Resolves once a token has been stored.
    pub async fn ready(&self) {
        let mut rx = self.token.subscribe();
        let _ = rx.wait_for(|token| !token.is_empty()).await;
    }

    /// Fetches a new token and stores it, returning its lifetime in
    /// milliseconds. A grant without an access token leaves the current
    /// token untouched.
    pub async fn renew(&self) -> Result<u64> {
        let grant = self.source.fetch_token().await?;

        let access_token = match grant.access_token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ResolverError::Auth("Invalid Spotify client.".into())),
        };

        let expires_in_ms = grant.expires_in.unwrap_or(0).saturating_mul(1000);
        self.token.send_replace(Token {
            value: format!("Bearer {}", access_token),
            expires_in_ms,
            obtained_at: Utc::now().timestamp(),
        });

        Ok(expires_in_ms)
    }

    /// Spawns the renewal task: renew now, sleep for the token lifetime,
    /// renew again, for as long as the returned handle lives.
    pub fn start(self: &Arc<Self>) -> RenewalHandle {
        let manager = Arc::clone(self);
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = manager.renewal_loop() => {}
                _ = &mut stopped => {}
            }
        });

        RenewalHandle { stop, task }
    }

    async fn renewal_loop(&self) {
        let mut failures = 0;

        loop {
            match self.renew().await {
                Ok(lifetime) => {
                    failures = 0;
                    let lifetime = lifetime.max(MIN_LIFETIME_MS);
                    if let Some(expires_at) = expiry(&self.token(), lifetime) {
                        info!("Spotify token renewed, valid until {}", expires_at);
                    }
                    sleep(Duration::from_millis(lifetime)).await;
                }
                Err(e) => {
                    if failures >= self.retries {
                        warning!("Spotify token renewal stopped: {}", e);
                        return;
                    }
                    failures += 1;
                    warning!(
                        "Spotify token renewal failed ({}), attempt {}/{} in {}s",
                        e,
                        failures,
                        self.retries,
                        RENEWAL_RETRY_DELAY.as_secs()
                    );
                    sleep(RENEWAL_RETRY_DELAY).await;
                }
            }
        }
    }
}

fn expiry(token: &Token, lifetime_ms: u64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(token.obtained_at + (lifetime_ms / 1000) as i64, 0)
}

/// Handle to the renewal task. Dropping it stops the task as well.
pub struct RenewalHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RenewalHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the renewal task and waits for it to exit.
    pub async fn shutdown(self) {
        let RenewalHandle { stop, task } = self;
        let _ = stop.send(());
        let _ = task.await;
    }
}
