use thiserror::Error;

/// Error type for password operations.
///
/// `InvalidHash` means the stored blob could not be interpreted at all.
/// Callers must present it to the outside world exactly like a mismatch;
/// distinguishing the two would leak which accounts hold corrupt records.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid hashing cost parameters: {0}")]
    InvalidParams(String),

    #[error("Stored password hash is malformed: {0}")]
    InvalidHash(String),
}
