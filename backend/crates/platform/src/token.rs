//! Bearer Tokens
//!
//! HS256-signed JWTs carrying the authenticated user's id and email.
//! Expiry is enforced on verify with zero leeway.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token lifetime: one hour
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed, wrongly signed, or otherwise unusable
    #[error("Token is invalid")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token signing secret must not be empty")]
    MissingSecret,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token valid for the configured lifetime from now.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Sign a token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &str,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at + self.ttl;
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token.trim(), &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::seconds(DEFAULT_TOKEN_TTL_SECS)).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let svc = service();
        let issued = svc.issue("user-1", "a@b.c").unwrap();
        let claims = svc.verify(&issued.token).unwrap();

        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_expired_token() {
        let svc = service();
        let past = Utc::now() - svc.ttl() - Duration::seconds(1);
        let issued = svc.issue_at("user-1", "a@b.c", past).unwrap();

        assert_eq!(svc.verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let issued = service().issue("user-1", "a@b.c").unwrap();
        let other = TokenService::new(b"other-secret", Duration::hours(1)).unwrap();

        assert_eq!(other.verify(&issued.token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_payload() {
        let svc = service();
        let issued = svc.issue("user-1", "a@b.c").unwrap();
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged = svc.issue("user-2", "x@y.z").unwrap();
        let forged_payload = forged.token.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;

        assert_eq!(svc.verify(&parts.join(".")), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage() {
        let svc = service();
        assert_eq!(svc.verify(""), Err(TokenError::Invalid));
        assert_eq!(svc.verify("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenService::new(b"", Duration::hours(1)),
            Err(TokenError::MissingSecret)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        assert!(!format!("{:?}", service()).contains("test-secret"));
    }
}
