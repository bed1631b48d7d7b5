//! Manager-account credential storage and acceptance rules.
//!
//! There is no self-service signup; the `create-user` CLI provisions the
//! handful of manager accounts and resets their passwords. Hashes are
//! Argon2id PHC strings, so the algorithm parameters and salt travel with
//! each stored hash and a login years later still verifies.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum length applied when `MIN_PASSWORD_LENGTH` is unset.
const DEFAULT_MIN_LENGTH: usize = 8;

/// Acceptance rules applied when provisioning or resetting a password.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Read the policy from the environment.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `MIN_PASSWORD_LENGTH` | `8`     |
    pub fn from_env() -> Self {
        let min_length = std::env::var("MIN_PASSWORD_LENGTH")
            .ok()
            .map(|raw| {
                raw.parse()
                    .expect("MIN_PASSWORD_LENGTH must be a valid usize")
            })
            .unwrap_or(DEFAULT_MIN_LENGTH);
        Self { min_length }
    }

    /// Check a candidate password against the policy. Length is counted in
    /// characters, not bytes, so multibyte passphrases are not over-counted.
    pub fn check(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        Ok(())
    }
}

/// Hash a password for storage, salting via [`OsRng`].
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a login attempt against the stored PHC hash.
///
/// A mismatch is `Ok(false)`; `Err` means the stored hash itself is
/// malformed, which login surfaces as a server error rather than a 401.
pub fn verify_password(
    candidate: &str,
    stored: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_the_original_password() {
        let hash = hash_password("rota-front-desk-2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("rota-front-desk-2024", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_a_mismatch_not_an_error() {
        let hash = hash_password("rota-front-desk-2024").unwrap();
        assert!(!verify_password("rota-front-desk-2025", &hash).unwrap());
    }

    #[test]
    fn each_hash_gets_a_fresh_salt() {
        let first = hash_password("shared-password").unwrap();
        let second = hash_password("shared-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn policy_rejects_short_password_and_names_the_limit() {
        let policy = PasswordPolicy { min_length: 10 };
        let msg = policy.check("week1").unwrap_err();
        assert!(msg.contains("at least 10"));
    }

    #[test]
    fn policy_accepts_password_at_the_boundary() {
        let policy = PasswordPolicy::default();
        policy.check("rota4ever").unwrap();
        policy.check("12345678").unwrap();
    }

    #[test]
    fn policy_counts_characters_not_bytes() {
        // Four two-byte characters are still only four characters.
        let policy = PasswordPolicy { min_length: 5 };
        assert!(policy.check("éééé").is_err());
    }
}
