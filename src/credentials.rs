//! Admin credential storage and password rules.
//!
//! Passwords are never kept in the store: only a random salt and the SHA-256
//! digest of `salt || password`. Verification compares digests in constant
//! time.

use std::fmt;

use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Credential pair that unlocks the one-time admin setup before any admin
/// account exists.
pub const SETUP_SENTINEL_EMAIL: &str = "admin";
pub const SETUP_SENTINEL_PASSWORD: &str = "admin";

const SALT_LEN: usize = 16;

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl PasswordHash {
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill(&mut salt);
        Self::with_salt(salt, password)
    }

    fn with_salt(salt: [u8; SALT_LEN], password: &str) -> Self {
        Self {
            salt,
            digest: digest(&salt, password),
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        constant_time_eq(&self.digest, &digest(&self.salt, password))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff: u8 = 0;
    for i in 0..32 {
        diff |= a[i] ^ b[i];
    }
    diff == 0
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    password: PasswordHash,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into(),
            password: PasswordHash::new(password),
        }
    }

    pub fn verify(&self, email: &str, password: &str) -> bool {
        // evaluate both so a wrong email costs the same as a wrong password
        let email_ok = self.email == email;
        let password_ok = self.password.verify(password);
        email_ok & password_ok
    }
}

pub fn is_setup_sentinel(email: &str, password: &str) -> bool {
    email == SETUP_SENTINEL_EMAIL && password == SETUP_SENTINEL_PASSWORD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub level: StrengthLevel,
    /// Number of satisfied requirements, out of [`REQUIREMENT_COUNT`].
    pub score: u8,
}

pub const REQUIREMENT_COUNT: u8 = 5;
const MIN_ACCEPTED_SCORE: u8 = 3;
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SYMBOLS.contains(c)),
    ];
    let score = checks.into_iter().filter(|&ok| ok).count() as u8;
    let level = match score {
        0 | 1 => StrengthLevel::Weak,
        2 => StrengthLevel::Medium,
        3 | 4 => StrengthLevel::Strong,
        _ => StrengthLevel::VeryStrong,
    };
    PasswordStrength { level, score }
}

pub fn is_strong_enough(password: &str) -> bool {
    password_strength(password).score >= MIN_ACCEPTED_SCORE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupValidationError {
    #[error("all fields are required")]
    MissingField,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("choose a stronger password (8+ characters and at least three of upper case, lower case, digits, symbols)")]
    WeakPassword,
}

/// Checks the admin setup form before `complete_admin_setup` is called.
pub fn validate_admin_setup(email: &str, password: &str, confirmation: &str) -> Result<(), SetupValidationError> {
    if email.trim().is_empty() || password.trim().is_empty() || confirmation.trim().is_empty() {
        return Err(SetupValidationError::MissingField);
    }
    if !email.contains('@') {
        return Err(SetupValidationError::InvalidEmail);
    }
    if password != confirmation {
        return Err(SetupValidationError::PasswordMismatch);
    }
    if !is_strong_enough(password) {
        return Err(SetupValidationError::WeakPassword);
    }
    Ok(())
}
