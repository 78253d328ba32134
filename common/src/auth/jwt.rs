//! Bearer token issuance and verification
//!
//! Tokens are compact HS256 JWS strings carrying the username as `sub`, the
//! issue and expiry times in seconds since the epoch, and a random `jti`.
//! They are stateless: nothing is stored server side, and validity is decided
//! purely by the signature and the expiry claim.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Shortest secret accepted for HMAC-SHA256 signing, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// JWT-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("Token lifetime must be a positive number of seconds within the date range")]
    InvalidLifetime,

    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by every token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Unique token identifier
    pub jti: String,
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// The keys are derived directly from the configured secret's bytes; no key
/// derivation function is applied.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from the shared secret and token lifetime.
    ///
    /// Fails with [`JwtError::WeakSecret`] when the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes, and with [`JwtError::InvalidLifetime`] when
    /// `ttl_seconds` is not positive or an expiry that far out can't be
    /// represented.
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::WeakSecret);
        }

        let ttl = Duration::try_seconds(ttl_seconds)
            .filter(|ttl| *ttl > Duration::zero())
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(JwtError::InvalidLifetime)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            ttl_seconds,
        })
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a token asserting `subject`, valid from now for the configured lifetime
    pub fn issue(&self, subject: &str) -> Result<String, JwtError> {
        self.issue_at(subject, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let exp = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(JwtError::InvalidLifetime)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify the signature, structure and expiry of a token and return its claims.
    ///
    /// Every read path goes through here, so expiry is enforced uniformly.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Return the subject of a valid, unexpired token
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Check that `token` is valid, unexpired and asserts `expected_subject`.
    ///
    /// Fails closed: any decode error or subject mismatch yields `false`.
    pub fn verify(&self, token: &str, expected_subject: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.sub == expected_subject,
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";

    fn service() -> TokenService {
        TokenService::new(SECRET, 900).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service();
        let token = tokens.issue("alice").unwrap();

        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
        assert!(tokens.verify(&token, "alice"));
        assert_eq!(tokens.extract_subject(&token).unwrap(), "alice");
    }

    #[test]
    fn test_claims_carry_lifetime() {
        let tokens = service();
        let claims = tokens.decode(&tokens.issue("alice").unwrap()).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_tokens_for_same_subject_differ() {
        let tokens = service();
        let first = tokens.issue("alice").unwrap();
        let second = tokens.issue("alice").unwrap();

        assert_ne!(first, second);
        assert!(tokens.verify(&first, "alice"));
        assert!(tokens.verify(&second, "alice"));
    }

    #[test]
    fn test_subject_mismatch() {
        let tokens = service();
        let token = tokens.issue("alice").unwrap();
        assert!(!tokens.verify(&token, "bob"));
    }

    #[test]
    fn test_expired_token() {
        let tokens = service();
        let token = tokens
            .issue_at("alice", Utc::now() - Duration::seconds(901))
            .unwrap();

        assert!(!tokens.verify(&token, "alice"));
        assert_eq!(tokens.extract_subject(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_token_valid_until_expiry() {
        let tokens = service();
        let token = tokens
            .issue_at("alice", Utc::now() - Duration::seconds(850))
            .unwrap();
        assert!(tokens.verify(&token, "alice"));
    }

    #[test]
    fn test_tampered_signature() {
        let tokens = service();
        let token = tokens.issue("alice").unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[signature_start] = if bytes[signature_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(!tokens.verify(&tampered, "alice"));
        assert!(matches!(
            tokens.extract_subject(&tampered),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let tokens = service();
        assert!(!tokens.verify("invalid.token.here", "alice"));
        assert!(!tokens.verify("", "alice"));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenService::new("first-secret-first-secret-first-secret", 900).unwrap();
        let verifier = TokenService::new("second-secret-second-secret-second-secret", 900).unwrap();

        let token = issuer.issue("alice").unwrap();
        assert!(!verifier.verify(&token, "alice"));
    }

    #[test]
    fn test_unrepresentable_lifetime_rejected() {
        for ttl in [0, -1, i64::MAX / 1000, i64::MAX] {
            assert_eq!(
                TokenService::new(SECRET, ttl).unwrap_err(),
                JwtError::InvalidLifetime,
                "ttl {}",
                ttl
            );
        }
    }

    #[test]
    fn test_long_lifetime_still_issues() {
        // About a thousand years
        let tokens = TokenService::new(SECRET, 1000 * 365 * 86_400).unwrap();
        let token = tokens.issue("alice").unwrap();
        assert!(tokens.verify(&token, "alice"));
    }

    #[test]
    fn test_weak_secret_rejected() {
        assert_eq!(TokenService::new("", 900).unwrap_err(), JwtError::WeakSecret);
        assert_eq!(
            TokenService::new("short", 900).unwrap_err(),
            JwtError::WeakSecret
        );
    }
}
