//! Password hashing with bcrypt

use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

impl From<bcrypt::BcryptError> for PasswordError {
    fn from(e: bcrypt::BcryptError) -> Self {
        PasswordError::HashingFailed(e.to_string())
    }
}

/// One-way salted password hasher.
///
/// Hashing and verification block the calling thread for the whole bcrypt
/// work factor. Async callers run them on the blocking pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt work factor.
    ///
    /// Fails if the cost is outside the range bcrypt accepts.
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let dummy_hash = bcrypt::hash("configmanager-dummy-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash verifies as `false`.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Burn the same amount of work as a real verification.
    ///
    /// Used when there is no stored hash to check against, so that a missing
    /// user takes as long to reject as a wrong password.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = bcrypt::verify(plaintext, &self.dummy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        // Lowest cost bcrypt accepts, to keep the tests fast
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("p@ss1234").unwrap();

        assert_ne!(hash, "p@ss1234");
        assert!(hasher.verify("p@ss1234", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("p@ss1234").unwrap();
        let second = hasher.hash("p@ss1234").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        let hasher = hasher();
        assert!(!hasher.verify("p@ss1234", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_verify_dummy_never_succeeds() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy("configmanager-dummy-password"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(PasswordHasher::new(2).is_err());
    }
}
