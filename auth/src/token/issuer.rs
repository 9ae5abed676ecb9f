use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::TokenError;

/// Builds and signs bearer tokens for verified identities.
///
/// The signing key and issuer name are injected at construction and the
/// signing algorithm is fixed to HS256; nothing about a token is chosen
/// per call except the subject and validity window.
///
/// # Security Notes
/// - The key should be at least 256 bits (32 bytes) for HS256
/// - Store the key in environment variables or a secrets manager, never
///   in code; a missing key is a startup failure, not a per-call error
/// - Rotating the key invalidates every outstanding token
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    header: Header,
    issuer: String,
}

impl TokenIssuer {
    /// Create a token issuer for this deployment.
    ///
    /// # Arguments
    /// * `signing_key` - Symmetric signing key shared with the verifiers
    /// * `issuer` - Issuer name stamped into every claim set
    pub fn new(signing_key: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            header: Header::new(Algorithm::HS256),
            issuer: issuer.into(),
        }
    }

    /// Issue a signed token for a subject.
    ///
    /// Sets `iat = nbf = now` and `exp = now + ttl`, then signs the claim
    /// set with the deployment key.
    ///
    /// # Arguments
    /// * `subject` - Identity id the token is bound to
    /// * `display_name` - Username carried alongside the subject
    /// * `now` - Issuance instant
    /// * `ttl` - How long the token stays valid
    ///
    /// # Errors
    /// * `EncodingFailed` - Claim serialization or signing failed
    pub fn issue(
        &self,
        subject: &str,
        display_name: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let issued_at = now.timestamp();

        let claims = Claims {
            sub: subject.to_string(),
            username: display_name.to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }
}
