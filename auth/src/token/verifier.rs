use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Verifies presented bearer tokens against the deployment signing key.
///
/// The accepted algorithm list is pinned to HS256 at construction; the
/// `alg` a presented token declares is only ever compared against that
/// list, never used to select a verification method. The validity window
/// is checked against the `now` the caller supplies, which keeps the
/// clock source in the caller's hands.
///
/// The verifier holds no mutable state and can be shared freely across
/// concurrent requests.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a token verifier for this deployment.
    ///
    /// # Arguments
    /// * `signing_key` - Symmetric key shared with the issuer
    /// * `issuer` - Issuer name every accepted token must carry
    pub fn new(signing_key: &[u8], issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp and nbf are checked in verify() against the caller's clock
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.set_issuer(&[issuer]);

        Self {
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
        }
    }

    /// Verify a token and return its claim set.
    ///
    /// Checks run in order, each short-circuiting: structural parse,
    /// signature, issuer, then `nbf <= now <= exp`.
    ///
    /// # Errors
    /// * `Malformed` - Not compact JWT encoding, or the claims do not form
    ///   the expected claim set
    /// * `BadSignature` - Signature mismatch, or the token declares an
    ///   algorithm other than the deployment's
    /// * `WrongIssuer` - Issuer claim names a different deployment
    /// * `NotYetValid` / `Expired` - `now` falls outside the validity
    ///   window
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        let now = now.timestamp();

        if claims.is_not_yet_valid(now) {
            return Err(TokenError::NotYetValid);
        }
        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;

    use super::*;
    use crate::token::TokenIssuer;

    const KEY: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
    const ISSUER: &str = "auth-service";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(KEY, ISSUER)
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(KEY, ISSUER)
    }

    /// Replace the first character of `segment` so it decodes to
    /// different bytes while staying valid base64url.
    fn flip_first_char(segment: &str) -> String {
        let replacement = if segment.starts_with('A') { 'B' } else { 'A' };
        format!("{}{}", replacement, &segment[1..])
    }

    #[test]
    fn test_verify_roundtrip_same_now() {
        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(24))
            .unwrap();

        let claims = verifier().verify(&token, now).expect("Failed to verify");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_verify_exactly_at_expiration() {
        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        // Valid through exp inclusive
        assert!(verifier().verify(&token, now + Duration::hours(1)).is_ok());
    }

    #[test]
    fn test_verify_expired() {
        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        let later = now + Duration::hours(1) + Duration::seconds(1);
        assert!(matches!(
            verifier().verify(&token, later),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_verify_not_yet_valid() {
        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        let earlier = now - Duration::seconds(1);
        assert!(matches!(
            verifier().verify(&token, earlier),
            Err(TokenError::NotYetValid)
        ));
    }

    #[test]
    fn test_flipped_signature_is_bad_signature_not_malformed() {
        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        let (message, signature) = token.rsplit_once('.').unwrap();
        let tampered = format!("{}.{}", message, flip_first_char(signature));

        // Structure still parses, so the failure must classify as a
        // signature mismatch
        assert!(matches!(
            verifier().verify(&tampered, now),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        let tampered = format!(
            "{}.{}.{}",
            segments[0],
            flip_first_char(segments[1]),
            segments[2]
        );

        assert!(matches!(
            verifier().verify(&tampered, now),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            verifier().verify("invalid.token.here", Utc::now()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_segment_is_malformed() {
        assert!(matches!(
            verifier().verify("only.twoparts", Utc::now()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_alg_none_is_rejected() {
        // base64url({"alg":"none"})
        const NONE_HEADER: &str = "eyJhbGciOiJub25lIn0";

        let now = Utc::now();
        let token = issuer()
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        let unsigned = format!("{}.{}.", NONE_HEADER, segments[1]);

        // "none" is not representable in the algorithm set, so the token
        // cannot even parse, let alone verify
        assert!(matches!(
            verifier().verify(&unsigned, now),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_other_hmac_algorithm_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "user123".to_string(),
            username: "alice".to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: ISSUER.to_string(),
        };

        // Self-consistent HS384 token signed with the deployment key
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();

        assert!(matches!(
            verifier().verify(&token, now),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let now = Utc::now();
        let other_issuer = TokenIssuer::new(b"another-secret-key-also-32-bytes-long!!", ISSUER);
        let token = other_issuer
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        assert!(matches!(
            verifier().verify(&token, now),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let now = Utc::now();
        let other_deployment = TokenIssuer::new(KEY, "billing-service");
        let token = other_deployment
            .issue("user123", "alice", now, Duration::hours(1))
            .unwrap();

        assert!(matches!(
            verifier().verify(&token, now),
            Err(TokenError::WrongIssuer)
        ));
    }
}
