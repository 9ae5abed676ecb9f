use async_trait::async_trait;
use auth::Claims;

use crate::identity::errors::AuthError;
use crate::identity::models::AuthGrant;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::Username;

/// Port for the credential gateway operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token.
    ///
    /// # Arguments
    /// * `username` - Requested username (validated here)
    /// * `email` - Requested email address (validated here)
    /// * `password` - Plaintext password; hashed before anything is stored
    ///
    /// # Returns
    /// Signed token plus the secret-free identity projection
    ///
    /// # Errors
    /// * `InvalidUsername` / `InvalidEmail` - Input failed validation
    /// * `AlreadyExists` - Username or email is already registered
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, AuthError>;

    /// Verify credentials and issue a fresh token.
    ///
    /// # Returns
    /// Signed token plus the secret-free identity projection
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password; the
    ///   two cases are indistinguishable by design
    async fn login(&self, username: &str, password: &str) -> Result<AuthGrant, AuthError>;

    /// Validate a raw Authorization header value and return the claims.
    ///
    /// # Arguments
    /// * `authorization` - Full header value, expected as `Bearer <token>`
    ///   with the prefix matched exactly and case-sensitively
    ///
    /// # Errors
    /// * `Unauthorized` - Bad prefix, any token verification failure, or
    ///   a subject no longer present in the store
    async fn check(&self, authorization: &str) -> Result<Claims, AuthError>;
}

/// Persistence operations for the credential store.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// The uniqueness check and the insert must be atomic with respect to
    /// concurrent calls: two racing registrations of the same username
    /// must not both succeed.
    ///
    /// # Errors
    /// * `AlreadyExists` - Username or email is already present
    ///   (exact, case-sensitive match)
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Retrieve an identity by username (exact, case-sensitive).
    ///
    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_username(&self, username: &Username) -> Result<Option<Identity>, AuthError>;

    /// Check whether an identity id is currently present.
    ///
    /// Verifiers re-check this on every validation; removing an identity
    /// from the store is the only way to revoke its outstanding tokens.
    async fn exists(&self, id: &IdentityId) -> Result<bool, AuthError>;
}
