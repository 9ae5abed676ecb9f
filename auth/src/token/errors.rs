use thiserror::Error;

/// Error type for token operations.
///
/// The verification kinds follow the order in which the verifier checks a
/// presented token. They exist for logging and metrics; callers facing
/// external clients must collapse them into a single unauthorized result.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is structurally invalid: {0}")]
    Malformed(String),

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token was issued for a different deployment")]
    WrongIssuer,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Token is expired")]
    Expired,
}
