use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::identity::errors::EmailError;
use crate::identity::errors::IdentityIdError;
use crate::identity::errors::UsernameError;

/// Identity aggregate entity.
///
/// One registered account. The password hash is the only secret field;
/// it never crosses the gateway boundary except into the hasher.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Identity unique identifier type
///
/// Assigned once at registration and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity id from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// 3-32 characters, alphanumeric plus underscore and hyphen. Compared
/// exactly; uniqueness in the store is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - Length outside 3-32 characters
    /// * `InvalidCharacters` - Anything beyond alphanumeric, `_`, `-`
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Secret-free projection of an identity.
///
/// This is the only identity shape handed back to callers; it must never
/// grow a password hash field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            created_at: identity.created_at,
        }
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    /// Signed bearer token
    pub token: String,
    /// The identity the token was issued for
    pub identity: IdentityData,
}
