use serde::Deserialize;
use serde::Serialize;

/// Claim set embedded in every signed token.
///
/// Every field is mandatory; a token missing any of them fails structural
/// parsing. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: String,

    /// Display name of the subject
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer (constant per deployment)
    pub iss: String,
}

impl Claims {
    /// Check whether the token is expired at `now`.
    ///
    /// Tokens are valid through `exp` inclusive.
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp < now
    }

    /// Check whether the token is not yet valid at `now`.
    ///
    /// Tokens become valid at `nbf` inclusive.
    pub fn is_not_yet_valid(&self, now: i64) -> bool {
        now < self.nbf
    }
}
