use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenVerifier;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::identity::errors::AuthError;
use crate::identity::models::AuthGrant;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityData;
use crate::identity::models::IdentityId;
use crate::identity::models::Username;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::IdentityRepository;

/// Required prefix of the Authorization header value, case-sensitive.
const BEARER_PREFIX: &str = "Bearer ";

/// Credential gateway.
///
/// Orchestrates the credential store, password hasher, token issuer and
/// token verifier behind the three external operations (register, login,
/// check). This is the only component carrying I/O-facing policy; the
/// parts it coordinates are pure.
pub struct AuthService<R>
where
    R: IdentityRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_verifier: TokenVerifier,
    token_ttl: Duration,
    // Verified against on a store miss so the miss path costs the same
    // as a password mismatch
    fallback_hash: String,
}

impl<R> AuthService<R>
where
    R: IdentityRepository,
{
    /// Create the gateway from deployment settings.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `settings` - Signing key, issuer name, ttl, and hashing costs
    ///
    /// # Errors
    /// * `Configuration` - Empty signing key or unusable hashing costs;
    ///   either is fatal at startup, not per request
    pub fn new(repository: Arc<R>, settings: &AuthSettings) -> Result<Self, AuthError> {
        if settings.signing_key.trim().is_empty() {
            return Err(AuthError::Configuration(
                "signing key must be non-empty".to_string(),
            ));
        }

        let password_hasher = PasswordHasher::with_params(
            settings.hashing.memory_kib,
            settings.hashing.iterations,
            settings.hashing.parallelism,
        )
        .map_err(|e| AuthError::Configuration(e.to_string()))?;

        let fallback_hash = password_hasher
            .hash(&Uuid::new_v4().to_string())
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        let signing_key = settings.signing_key.as_bytes();

        Ok(Self {
            repository,
            password_hasher,
            token_issuer: TokenIssuer::new(signing_key, settings.issuer.clone()),
            token_verifier: TokenVerifier::new(signing_key, &settings.issuer),
            token_ttl: Duration::hours(settings.token_ttl_hours),
            fallback_hash,
        })
    }

    fn issue_grant(&self, identity: &Identity) -> Result<AuthGrant, AuthError> {
        let token = self
            .token_issuer
            .issue(
                &identity.id.to_string(),
                identity.username.as_str(),
                Utc::now(),
                self.token_ttl,
            )
            .map_err(|e| AuthError::Unknown(format!("Token signing failed: {}", e)))?;

        Ok(AuthGrant {
            token,
            identity: IdentityData::from(identity),
        })
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: IdentityRepository,
{
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, AuthError> {
        let username = Username::new(username.to_string())?;
        let email = EmailAddress::new(email.to_string())?;

        // CPU-bound; runs before the store is touched so no lock is held
        // while hashing
        let password_hash = self
            .password_hasher
            .hash(password)
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        let identity = Identity {
            id: IdentityId::new(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        let identity = self.repository.create(identity).await?;

        tracing::info!(identity = %identity.id, "Registered new identity");

        self.issue_grant(&identity)
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthGrant, AuthError> {
        // A name that cannot exist is reported exactly like a miss
        let username =
            Username::new(username.to_string()).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = match self.repository.find_by_username(&username).await? {
            Some(identity) => identity,
            None => {
                // Equalize timing with the mismatch path below
                let _ = self.password_hasher.verify(password, &self.fallback_hash);
                return Err(AuthError::InvalidCredentials);
            }
        };

        match self
            .password_hasher
            .verify(password, &identity.password_hash)
        {
            Ok(true) => self.issue_grant(&identity),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(PasswordError::InvalidHash(_)) => {
                tracing::warn!(identity = %identity.id, "Stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!(identity = %identity.id, error = %e, "Password verification failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn check(&self, authorization: &str) -> Result<Claims, AuthError> {
        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::Unauthorized)?;

        let claims = self
            .token_verifier
            .verify(token, Utc::now())
            .map_err(|e| {
                tracing::warn!(reason = %e, "Token rejected");
                AuthError::Unauthorized
            })?;

        let subject = IdentityId::from_string(&claims.sub).map_err(|_| {
            tracing::warn!("Token subject is not a valid identity id");
            AuthError::Unauthorized
        })?;

        if !self.repository.exists(&subject).await? {
            // Removal from the store is the only revocation mechanism
            tracing::warn!(subject = %subject, reason = "unknown_subject", "Token rejected");
            return Err(AuthError::Unauthorized);
        }

        Ok(claims)
    }
}
