use thiserror::Error;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for gateway operations.
///
/// The credential variants deliberately carry no detail. A store miss, a
/// password mismatch, and an unreadable stored hash all surface as the
/// same `InvalidCredentials`; every token failure surfaces as
/// `Unauthorized`. The specific internal kind goes to logs only, never
/// to the caller.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("An account with that username or email already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Service misconfigured: {0}")]
    Configuration(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
