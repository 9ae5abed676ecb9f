//! Bearer credential primitives.
//!
//! Building blocks for the credential verification and token lifecycle
//! core shared by every service in the deployment:
//! - Password hashing (Argon2id, salted PHC strings)
//! - Signed bearer token issuance and verification (HS256)
//!
//! The surrounding service layer owns identity storage and orchestration;
//! this crate is pure computation and holds no mutable state, so a single
//! instance of each type can serve arbitrarily many concurrent requests.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Token Lifecycle
//! ```
//! use auth::{TokenIssuer, TokenVerifier};
//! use chrono::{Duration, Utc};
//!
//! let key = b"secret_key_at_least_32_bytes_long!";
//! let now = Utc::now();
//!
//! let issuer = TokenIssuer::new(key, "auth-service");
//! let token = issuer.issue("user123", "alice", now, Duration::hours(24)).unwrap();
//!
//! let verifier = TokenVerifier::new(key, "auth-service");
//! let claims = verifier.verify(&token, now).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenVerifier;
