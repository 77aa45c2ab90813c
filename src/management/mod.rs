mod auth;
mod credentials;

pub use auth::RENEWAL_RETRY_DELAY;
pub use auth::RenewalHandle;
pub use auth::TokenManager;
pub use auth::TokenSource;
pub use credentials::Credentials;
