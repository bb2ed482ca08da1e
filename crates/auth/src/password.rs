//! One-way salted password hashing (bcrypt).

use thiserror::Error;

/// Lowest and highest cost factors bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Cost used when nothing else is configured.
pub const DEFAULT_COST: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// A stored password digest.
///
/// Only the hasher (or a persistence layer handing back a previously stored
/// digest) can build one, so a plaintext password never ends up in a
/// credential by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest that was produced by a [`PasswordHasher`] earlier.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Hashing seam used by the credential lifecycle.
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt embedded in the output.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordError>;

    /// Check `plaintext` against `digest`. A malformed digest yields `false`.
    fn verify(&self, plaintext: &str, digest: &PasswordHash) -> bool;
}

/// bcrypt with a configurable cost factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordError> {
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash)
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &PasswordHash) -> bool {
        // bcrypt compares the derived digest in constant time.
        bcrypt::verify(plaintext, digest.as_str()).unwrap_or(false)
    }
}
