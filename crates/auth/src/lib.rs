//! `logbook-auth`: credential hashing and session tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use password::{BcryptHasher, PasswordError, PasswordHash, PasswordHasher};
pub use token::{Hs256Tokens, TokenError, TokenIssuer, TokenVerifier};
