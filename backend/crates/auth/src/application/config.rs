//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;

use chrono::Duration;
use kernel::hypermedia::BaseUrl;
use platform::password::HashCost;
use platform::token::DEFAULT_TOKEN_TTL_SECS;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens
    pub token_secret: Vec<u8>,
    /// Token lifetime
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id cost for new hashes
    pub hash_cost: HashCost,
    /// Accept a `token` field in JSON bodies when no Authorization header
    /// is sent. Deprecated.
    pub accept_body_token: bool,
    /// Require a token on `DELETE /users/{id}`
    pub strict_auth: bool,
    /// Public base URL for links
    pub base_url: BaseUrl,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            password_pepper: None,
            hash_cost: HashCost::default(),
            accept_body_token: false,
            strict_auth: true,
            base_url: BaseUrl::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Random secret and the cheapest hash cost. Local runs and tests only.
    pub fn development() -> Self {
        Self {
            hash_cost: HashCost::minimal(),
            ..Self::with_random_secret()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl.num_seconds())
            .field("password_pepper", &self.pepper().map(|_| "[REDACTED]"))
            .field("hash_cost", &self.hash_cost)
            .field("accept_body_token", &self.accept_body_token)
            .field("strict_auth", &self.strict_auth)
            .field("base_url", &self.base_url)
            .finish()
    }
}
