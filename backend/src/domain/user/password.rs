//! Argon2id password hashing.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;
use zeroize::Zeroizing;

/// Raised when hashing fails, typically because of invalid cost parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashError(String);

impl PasswordHashError {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PasswordHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to hash password: {}", self.0)
    }
}

impl std::error::Error for PasswordHashError {}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashing {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordHashing {
    /// Minimal cost for fast tests.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| PasswordHashError(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Salted PHC-format password hash.
///
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `plaintext` with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use assessmate::domain::{PasswordHash, PasswordHashing};
    ///
    /// let hash = PasswordHash::compute("correct horse", &PasswordHashing::testing())
    ///     .expect("hash");
    /// assert!(hash.verify("correct horse"));
    /// assert!(!hash.verify("battery staple"));
    /// ```
    pub fn compute(plaintext: &str, hashing: &PasswordHashing) -> Result<Self, PasswordHashError> {
        let plaintext = Zeroizing::new(plaintext.as_bytes().to_vec());
        let salt = SaltString::generate(&mut OsRng);
        let hash = hashing
            .hasher()?
            .hash_password(&plaintext, &salt)
            .map_err(|err| PasswordHashError(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap an existing PHC string without recomputing it.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Whether `plaintext` matches. Malformed stored hashes never match.
    #[must_use]
    pub fn verify(&self, plaintext: &str) -> bool {
        let parsed = match PhcHash::new(&self.0) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "stored password hash is malformed");
                return false;
            }
        };
        let plaintext = Zeroizing::new(plaintext.as_bytes().to_vec());
        Argon2::default()
            .verify_password(&plaintext, &parsed)
            .is_ok()
    }

    #[must_use]
    pub fn as_phc(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_are_salted() {
        let hashing = PasswordHashing::testing();
        let first = PasswordHash::compute("s3cret-pass", &hashing).expect("hash");
        let second = PasswordHash::compute("s3cret-pass", &hashing).expect("hash");
        assert_ne!(first, second);
        assert!(first.as_phc().starts_with("$argon2id$"));
        assert!(first.verify("s3cret-pass") && second.verify("s3cret-pass"));
    }

    #[rstest]
    fn malformed_hash_never_matches() {
        assert!(!PasswordHash::from_phc("plain-text").verify("plain-text"));
    }

    #[rstest]
    fn invalid_cost_parameters_are_reported() {
        let hashing = PasswordHashing {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(PasswordHash::compute("whatever", &hashing).is_err());
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::from_phc("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
